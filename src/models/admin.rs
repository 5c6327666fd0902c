//! Administrative levels used for admin-code matching.

use serde::{Deserialize, Serialize};

/// GeoNames administrative division level.
/// See: https://www.geonames.org/export/codes.html (class A)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum AdminLevel {
    /// First-order division (state, province, Land)
    Adm1,
    /// Second-order division (county, Regierungsbezirk)
    Adm2,
    /// Third-order division (municipality in AT/CH/ES/PL)
    Adm3,
    /// Fourth-order division (municipality in most other countries)
    Adm4,
}

impl AdminLevel {
    /// Feature code of class-A records at this level
    pub fn feature_code(&self) -> &'static str {
        match self {
            AdminLevel::Adm1 => "ADM1",
            AdminLevel::Adm2 => "ADM2",
            AdminLevel::Adm3 => "ADM3",
            AdminLevel::Adm4 => "ADM4",
        }
    }

    /// Document field holding the admin code for this level
    pub fn field_name(&self) -> &'static str {
        match self {
            AdminLevel::Adm1 => "admin1_code",
            AdminLevel::Adm2 => "admin2_code",
            AdminLevel::Adm3 => "admin3_code",
            AdminLevel::Adm4 => "admin4_code",
        }
    }

    /// All levels, coarsest first
    pub fn all() -> &'static [AdminLevel] {
        &[
            AdminLevel::Adm1,
            AdminLevel::Adm2,
            AdminLevel::Adm3,
            AdminLevel::Adm4,
        ]
    }

    pub(crate) fn index(&self) -> usize {
        match self {
            AdminLevel::Adm1 => 0,
            AdminLevel::Adm2 => 1,
            AdminLevel::Adm3 => 2,
            AdminLevel::Adm4 => 3,
        }
    }
}

impl std::fmt::Display for AdminLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.feature_code())
    }
}
