use colored_json::write_colored_json;
use csaf_retrieval::{
    loader::CsafLoader,
    model::advisory::{Advisory, CvssScore},
    retrieve::RetrievedDocument,
    validation::PUBLISHER,
};
use csaf_retrieval_common::cli::client::ClientArguments;
use serde_json::{Value, json};
use std::io::stdout;
use url::Url;

/// Load a single advisory and recalculate the CVSS scores it declares.
#[derive(clap::Args, Debug)]
pub struct Document {
    #[command(flatten)]
    client: ClientArguments,

    /// The URL of the advisory
    url: Url,
}

impl Document {
    pub async fn run(self) -> anyhow::Result<()> {
        let loader = CsafLoader::new(self.client.fetcher_options())?;

        let document = RetrievedDocument::from_url(self.url, &loader, &PUBLISHER).await?;

        let summary = json!({
            "id": document.advisory.unique_id(),
            "title": document.advisory.document.title,
            "url": document.url,
            "scores": scores(&document.advisory),
        });

        write_colored_json(&summary, &mut stdout().lock())?;
        println!();

        Ok(())
    }
}

/// All declared scores of an advisory, next to their recalculation.
fn scores(advisory: &Advisory) -> Vec<Value> {
    advisory
        .vulnerabilities
        .iter()
        .flat_map(|vulnerability| {
            vulnerability.scores.iter().flat_map(move |score| {
                [score.cvss_v3.as_ref(), score.cvss_v2.as_ref()]
                    .into_iter()
                    .flatten()
                    .map(move |cvss| {
                        json!({
                            "cve": vulnerability.cve,
                            "products": score.products,
                            "vector": cvss.vector_string,
                            "declared": cvss.base_score,
                            "calculated": recalculate(cvss),
                        })
                    })
            })
        })
        .collect()
}

fn recalculate(cvss: &CvssScore) -> Value {
    match csaf_cvss::scores(&cvss.vector_string) {
        Ok(scores) => {
            if scores.base != cvss.base_score {
                log::warn!(
                    "Declared base score {} of {} differs from calculated score {}",
                    cvss.base_score,
                    cvss.vector_string,
                    scores.base
                );
            }
            json!(scores)
        }
        Err(err) => {
            log::warn!("Unable to calculate score of {}: {err}", cvss.vector_string);
            json!({ "error": err.to_string() })
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn recalculates_declared_scores() {
        let advisory: Advisory = serde_json::from_value(json!({
            "document": {
                "category": "csaf_security_advisory",
                "csaf_version": "2.0",
                "title": "Test",
                "publisher": { "category": "vendor", "name": "Example", "namespace": "https://example.com" },
                "tracking": {
                    "id": "ESA-1",
                    "current_release_date": "2024-01-01T00:00:00Z",
                    "initial_release_date": "2024-01-01T00:00:00Z",
                    "status": "final",
                    "version": "1"
                }
            },
            "vulnerabilities": [{
                "cve": "CVE-2024-0001",
                "scores": [{
                    "products": ["a"],
                    "cvss_v3": {
                        "version": "3.1",
                        "vectorString": "CVSS:3.1/AV:N/AC:L/PR:N/UI:R/S:C/C:L/I:L/A:N",
                        "baseScore": 6.1
                    },
                    "cvss_v2": {
                        "version": "2.0",
                        "vectorString": "broken",
                        "baseScore": 1.0
                    }
                }]
            }]
        }))
        .unwrap();

        let scores = scores(&advisory);
        assert_eq!(scores.len(), 2);
        assert_eq!(scores[0]["calculated"]["base"], json!(6.1));
        assert_eq!(scores[0]["calculated"]["base_severity"], json!("MEDIUM"));
        assert!(scores[1]["calculated"]["error"].is_string());
    }
}
