use crate::Error;
use std::collections::HashMap;

/// Split a vector into its metrics.
///
/// When `versions` is set, the first metric must be `CVSS`, with one of those versions.
pub(crate) fn parse(vector: &str, versions: Option<&[&str]>) -> Result<Metrics, Error> {
    let mut metrics = HashMap::new();

    for (idx, part) in vector.split('/').enumerate() {
        let mut split = part.splitn(3, ':');
        let key = split.next().unwrap_or_default();
        let value = split.next();

        if let Some(versions) = versions {
            if idx == 0 && (key != "CVSS" || !value.is_some_and(|v| versions.contains(&v))) {
                return Err(Error::InvalidFormat);
            }
        }

        let Some(value) = value else {
            return Err(Error::MissingValue(key.to_string()));
        };

        if metrics.insert(key.to_string(), value.to_string()).is_some() {
            return Err(Error::DuplicateMetric(key.to_string()));
        }
    }

    Ok(Metrics(metrics))
}

/// Parsed metrics of a vector, by their abbreviation.
#[derive(Clone, Debug, Default)]
pub(crate) struct Metrics(pub(crate) HashMap<String, String>);

impl Metrics {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// A metric which must be present, with a value listed in `weights`.
    pub fn required(
        &self,
        key: &str,
        name: &'static str,
        weights: &[(&str, f64)],
    ) -> Result<f64, Error> {
        let value = self.get(key).ok_or(Error::MissingProperty(name))?;
        weight(value, name, weights)
    }

    /// A metric which may be missing, falling back to the `default` value.
    pub fn optional(
        &self,
        key: &str,
        name: &'static str,
        default: &str,
        weights: &[(&str, f64)],
    ) -> Result<f64, Error> {
        weight(self.get(key).unwrap_or(default), name, weights)
    }
}

fn weight(value: &str, name: &'static str, weights: &[(&str, f64)]) -> Result<f64, Error> {
    weights
        .iter()
        .find(|(symbol, _)| *symbol == value)
        .map(|(_, weight)| *weight)
        .ok_or_else(|| Error::InvalidValue {
            value: value.to_string(),
            name,
        })
}

#[cfg(test)]
mod test {
    use super::*;

    const V3: Option<&[&str]> = Some(&["3.0", "3.1"]);

    #[test]
    fn invalid_vectors() {
        assert_eq!(parse("", V3).unwrap_err(), Error::InvalidFormat);
        assert_eq!(parse("a/b", V3).unwrap_err(), Error::InvalidFormat);
        assert_eq!(parse("CVSS:3.2", V3).unwrap_err(), Error::InvalidFormat);
        assert_eq!(
            parse("CVSS:3.0/b", V3).unwrap_err(),
            Error::MissingValue("b".into())
        );
        assert_eq!(
            parse("CVSS:3.0/AC:L/AC:H", V3).unwrap_err(),
            Error::DuplicateMetric("AC".into())
        );
        assert_eq!(parse("", None).unwrap_err(), Error::MissingValue("".into()));
    }

    #[test]
    fn lookup() {
        let metrics = parse("AV:N/AC:Q", None).unwrap();
        let weights = [("N", 1.0), ("L", 0.5)];

        assert_eq!(metrics.required("AV", "access_vector", &weights), Ok(1.0));
        assert_eq!(
            metrics.required("Au", "authentication", &weights),
            Err(Error::MissingProperty("authentication"))
        );
        assert_eq!(
            metrics.required("AC", "access_complexity", &weights),
            Err(Error::InvalidValue {
                value: "Q".into(),
                name: "access_complexity"
            })
        );
        assert_eq!(
            metrics.optional("E", "exploitability", "L", &weights),
            Ok(0.5)
        );
    }
}
