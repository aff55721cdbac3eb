use colored_json::write_colored_json;
use std::io::stdout;

/// Calculate the scores of a CVSS vector.
#[derive(clap::Args, Debug)]
pub struct Cvss {
    /// The vector, CVSS v3 vectors start with `CVSS:3.x/`, all others are treated as CVSS v2
    vector: String,
}

impl Cvss {
    pub fn run(self) -> anyhow::Result<()> {
        let scores = csaf_cvss::scores(&self.vector)?;

        write_colored_json(&serde_json::to_value(scores)?, &mut stdout().lock())?;
        println!();

        Ok(())
    }
}
