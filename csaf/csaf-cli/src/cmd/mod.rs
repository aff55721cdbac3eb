pub mod aggregator;
pub mod cvss;
pub mod document;
pub mod provider;

use std::error::Error;

/// Render an error, with all of its causes, on a single line.
pub fn error_chain(err: &dyn Error) -> String {
    let mut result = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        result.push_str(": ");
        result.push_str(&cause.to_string());
        source = cause.source();
    }
    result
}

#[cfg(test)]
mod test {
    use super::*;
    use std::fmt::{Display, Formatter};

    #[derive(Debug)]
    struct Outer(std::fmt::Error);

    impl Display for Outer {
        fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
            f.write_str("outer")
        }
    }

    impl Error for Outer {
        fn source(&self) -> Option<&(dyn Error + 'static)> {
            Some(&self.0)
        }
    }

    #[test]
    fn chain() {
        assert_eq!(
            error_chain(&Outer(std::fmt::Error)),
            "outer: an error occurred when formatting an argument"
        );
    }
}
