use url::Url;

/// Get the URL something originates from
pub trait Urlify {
    fn url(&self) -> &Url;
}

impl<T, E> Urlify for Result<T, E>
where
    T: Urlify,
    E: Urlify,
{
    fn url(&self) -> &Url {
        match self {
            Ok(something) => something.url(),
            Err(something) => something.url(),
        }
    }
}

impl Urlify for Url {
    fn url(&self) -> &Url {
        self
    }
}
