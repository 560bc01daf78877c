use core::str::FromStr;

use serde::{Deserialize, Serialize};

use vaxtrack_core::{DomainError, DomainResult, Entity, Record, VaccineId};

/// Low-stock threshold applied when nothing else is configured.
pub const DEFAULT_ALERT_THRESHOLD: i64 = 10;

/// Vaccine family (fixed catalog of categories).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum VaccineFamily {
    #[serde(rename = "COVID-19")]
    Covid19,
    Influenza,
    Hepatitis,
    Pneumococcal,
    Meningococcal,
    #[serde(rename = "HPV")]
    Hpv,
    Tdap,
    #[serde(rename = "MMR")]
    Mmr,
    Varicella,
    Other,
}

impl VaccineFamily {
    pub const ALL: [VaccineFamily; 10] = [
        VaccineFamily::Covid19,
        VaccineFamily::Influenza,
        VaccineFamily::Hepatitis,
        VaccineFamily::Pneumococcal,
        VaccineFamily::Meningococcal,
        VaccineFamily::Hpv,
        VaccineFamily::Tdap,
        VaccineFamily::Mmr,
        VaccineFamily::Varicella,
        VaccineFamily::Other,
    ];

    pub fn label(self) -> &'static str {
        match self {
            VaccineFamily::Covid19 => "COVID-19",
            VaccineFamily::Influenza => "Influenza",
            VaccineFamily::Hepatitis => "Hepatitis",
            VaccineFamily::Pneumococcal => "Pneumococcal",
            VaccineFamily::Meningococcal => "Meningococcal",
            VaccineFamily::Hpv => "HPV",
            VaccineFamily::Tdap => "Tdap",
            VaccineFamily::Mmr => "MMR",
            VaccineFamily::Varicella => "Varicella",
            VaccineFamily::Other => "Other",
        }
    }
}

impl core::fmt::Display for VaccineFamily {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for VaccineFamily {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        VaccineFamily::ALL
            .into_iter()
            .find(|family| family.label().eq_ignore_ascii_case(s))
            .ok_or_else(|| DomainError::validation(format!("unknown vaccine family: {s:?}")))
    }
}

/// Catalog entry: a vaccine product stocked by the clinic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vaccine {
    pub id: VaccineId,
    pub commercial_name: String,
    pub generic_name: String,
    pub family: VaccineFamily,
    pub alert_threshold: i64,
}

/// Vaccine as submitted from the settings form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VaccineDraft {
    pub commercial_name: String,
    pub generic_name: String,
    pub family: VaccineFamily,
    pub alert_threshold: i64,
}

impl VaccineDraft {
    pub fn new(
        commercial_name: impl Into<String>,
        generic_name: impl Into<String>,
        family: VaccineFamily,
    ) -> Self {
        Self {
            commercial_name: commercial_name.into(),
            generic_name: generic_name.into(),
            family,
            alert_threshold: DEFAULT_ALERT_THRESHOLD,
        }
    }

    pub fn with_alert_threshold(mut self, threshold: i64) -> Self {
        self.alert_threshold = threshold;
        self
    }

    /// Check the draft and return it with names trimmed.
    pub fn validate(mut self) -> DomainResult<Self> {
        self.commercial_name = self.commercial_name.trim().to_string();
        self.generic_name = self.generic_name.trim().to_string();

        if self.commercial_name.is_empty() {
            return Err(DomainError::validation("commercial name is required"));
        }
        if self.generic_name.is_empty() {
            return Err(DomainError::validation("generic name is required"));
        }
        if self.alert_threshold < 0 {
            return Err(DomainError::validation(
                "alert threshold cannot be negative",
            ));
        }
        Ok(self)
    }
}

impl Vaccine {
    /// Replace the editable fields, keeping identity.
    pub fn revise(&self, draft: VaccineDraft) -> Self {
        Vaccine::from_draft(self.id, draft)
    }

    /// Display label used by selection lists ("Commercial (Generic)").
    pub fn display_name(&self) -> String {
        format!("{} ({})", self.commercial_name, self.generic_name)
    }
}

impl Entity for Vaccine {
    type Id = VaccineId;

    fn id(&self) -> Self::Id {
        self.id
    }
}

impl Record for Vaccine {
    type Draft = VaccineDraft;

    const KIND: &'static str = "vaccine";

    fn from_draft(id: Self::Id, draft: Self::Draft) -> Self {
        Self {
            id,
            commercial_name: draft.commercial_name,
            generic_name: draft.generic_name,
            family: draft.family,
            alert_threshold: draft.alert_threshold,
        }
    }
}
