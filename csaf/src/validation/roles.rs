use super::{
    DiscoveredBy, Requirement, Rule, TlpWhiteAccessible, Unchecked, UsageOfTls, ValidCsafDocument,
    ValidFilename, ValidationResult, all_of, none, one_of,
};
use crate::context::{DataSource, RetrievalContext};
use crate::model::{aggregator::Category, metadata};
use std::fmt::{Display, Formatter};
use std::sync::LazyLock;

/// A CSAF role, with the requirements for the party and for the documents it hosts.
#[derive(Debug)]
pub struct Role {
    pub name: &'static str,
    pub role_requirements: Rule,
    pub document_requirements: Rule,
}

impl Role {
    /// Check the metadata of a party.
    pub fn check_role(&self, ctx: &RetrievalContext<'_>) -> ValidationResult {
        self.role_requirements.check(ctx)
    }

    /// Check a document, hosted by a party of this role.
    pub fn check_document(&self, ctx: &RetrievalContext<'_>) -> ValidationResult {
        self.document_requirements.check(ctx)
    }
}

impl Display for Role {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name)
    }
}

fn unchecked(number: u8, name: &'static str) -> Rule {
    Rule::new(Unchecked { number, name })
}

fn documents() -> [Rule; 4] {
    [
        Rule::new(ValidCsafDocument),
        Rule::new(ValidFilename),
        Rule::new(UsageOfTls),
        Rule::new(TlpWhiteAccessible),
    ]
}

/// The "CSAF publisher" role.
pub static PUBLISHER: LazyLock<Role> = LazyLock::new(|| Role {
    name: "CSAF publisher",
    role_requirements: none(),
    document_requirements: all_of(documents()),
});

/// The "CSAF provider" role.
pub static PROVIDER: LazyLock<Role> = LazyLock::new(|| Role {
    name: "CSAF provider",
    role_requirements: PUBLISHER.role_requirements.clone()
        + all_of([
            unchecked(6, "No redirects"),
            unchecked(7, "provider-metadata.json"),
        ])
        + one_of([
            Rule::new(DiscoveredBy(DataSource::SecurityTxt)),
            Rule::new(DiscoveredBy(DataSource::WellKnown)),
            Rule::new(DiscoveredBy(DataSource::Dns)),
        ])
        + (all_of([
            unchecked(11, "One folder per year"),
            unchecked(12, "index.txt"),
            unchecked(13, "changes.csv"),
            unchecked(14, "Directory listings"),
        ]) | all_of([
            unchecked(15, "ROLIE feed"),
            unchecked(16, "ROLIE service document"),
            unchecked(17, "ROLIE category document"),
        ])),
    document_requirements: PUBLISHER.document_requirements.clone()
        + unchecked(5, "TLP:AMBER and TLP:RED"),
});

/// The "CSAF trusted provider" role.
pub static TRUSTED_PROVIDER: LazyLock<Role> = LazyLock::new(|| Role {
    name: "CSAF trusted provider",
    role_requirements: PROVIDER.role_requirements.clone() + unchecked(20, "Public OpenPGP Key"),
    document_requirements: PROVIDER.document_requirements.clone()
        + all_of([unchecked(18, "Integrity"), unchecked(19, "Signatures")]),
});

/// The "CSAF lister" role.
pub static LISTER: LazyLock<Role> = LazyLock::new(|| Role {
    name: "CSAF lister",
    role_requirements: all_of([
        unchecked(6, "No redirects"),
        unchecked(21, "List of CSAF providers"),
        unchecked(22, "Two disjoint issuing parties"),
    ]),
    document_requirements: none(),
});

/// The "CSAF aggregator" role.
pub static AGGREGATOR: LazyLock<Role> = LazyLock::new(|| Role {
    name: "CSAF aggregator",
    role_requirements: LISTER.role_requirements.clone() + unchecked(23, "Mirror"),
    document_requirements: all_of(documents().into_iter().chain([
        unchecked(5, "TLP:AMBER and TLP:RED"),
        unchecked(18, "Integrity"),
        unchecked(19, "Signatures"),
    ])),
});

impl From<metadata::Role> for &'static Role {
    fn from(value: metadata::Role) -> Self {
        match value {
            metadata::Role::Publisher => &*PUBLISHER,
            metadata::Role::Provider => &*PROVIDER,
            metadata::Role::TrustedProvider => &*TRUSTED_PROVIDER,
        }
    }
}

impl From<Category> for &'static Role {
    fn from(value: Category) -> Self {
        match value {
            Category::Lister => &*LISTER,
            Category::Aggregator => &*AGGREGATOR,
        }
    }
}
