/// Collect the messages of failed checks.
#[derive(Debug, Default)]
pub struct Checking {
    results: Vec<String>,
}

impl Checking {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn require(mut self, msg: impl Into<String>, ok: bool) -> Self {
        if !ok {
            self.results.push(msg.into());
        }
        self
    }

    pub fn done(self) -> Vec<String> {
        self.results
    }
}
