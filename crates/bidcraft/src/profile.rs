//! General contractor profiles.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ensure_named, Result};
use crate::persistence::{load_document, save_document, DocumentKind, DocumentStore};

/// Trade a contractor primarily bids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Specialty {
    Concrete,
    Framing,
    Drywall,
    Paint,
    #[default]
    General,
}

impl Specialty {
    /// All specialties, in display order.
    pub const ALL: [Specialty; 5] = [
        Specialty::Concrete,
        Specialty::Framing,
        Specialty::Drywall,
        Specialty::Paint,
        Specialty::General,
    ];

    /// Get a human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Specialty::Concrete => "Concrete",
            Specialty::Framing => "Framing",
            Specialty::Drywall => "Drywall",
            Specialty::Paint => "Paint",
            Specialty::General => "General",
        }
    }
}

impl std::str::FromStr for Specialty {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Specialty::ALL
            .iter()
            .find(|spec| spec.label().eq_ignore_ascii_case(s.trim()))
            .copied()
            .ok_or_else(|| {
                format!(
                    "Unknown specialty: {}. Use: concrete, framing, drywall, paint, or general.",
                    s
                )
            })
    }
}

impl std::fmt::Display for Specialty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// What is known about a contractor.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ContractorProfile {
    pub specialty: Specialty,
    #[serde(default)]
    pub license: String,
    #[serde(default)]
    pub region: String,
}

impl ContractorProfile {
    /// Create a profile for a specialty.
    pub fn new(specialty: Specialty) -> Self {
        Self {
            specialty,
            ..Self::default()
        }
    }

    /// Set the license number.
    pub fn with_license(mut self, license: impl Into<String>) -> Self {
        self.license = license.into();
        self
    }

    /// Set the operating region.
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = region.into();
        self
    }
}

/// Contractor profiles keyed by company name.
pub struct ProfileRegistry {
    backend: Box<dyn DocumentStore>,
    profiles: IndexMap<String, ContractorProfile>,
}

impl ProfileRegistry {
    /// Load profiles from `backend`.
    pub fn open(backend: impl DocumentStore + 'static) -> Result<Self> {
        Self::from_boxed(Box::new(backend))
    }

    /// Load profiles from an already boxed backend.
    pub fn from_boxed(backend: Box<dyn DocumentStore>) -> Result<Self> {
        let profiles = load_document(backend.as_ref(), DocumentKind::Profiles)?;
        Ok(Self { backend, profiles })
    }

    /// Save or replace the profile for `company`.
    pub fn save_profile(&mut self, company: &str, profile: ContractorProfile) -> Result<()> {
        ensure_named("company name", company)?;

        let previous = self.profiles.insert(company.to_string(), profile);

        if let Err(e) = save_document(self.backend.as_ref(), DocumentKind::Profiles, &self.profiles) {
            match previous {
                Some(prev) => {
                    self.profiles.insert(company.to_string(), prev);
                }
                None => {
                    self.profiles.shift_remove(company);
                }
            }
            return Err(e);
        }

        debug!(company, "contractor profile saved");
        Ok(())
    }

    /// Look up a profile by company name.
    pub fn get(&self, company: &str) -> Option<&ContractorProfile> {
        self.profiles.get(company)
    }

    /// Iterate profiles in the order they were first saved.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &ContractorProfile)> {
        self.profiles.iter()
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}
