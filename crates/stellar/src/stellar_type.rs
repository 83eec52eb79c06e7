//! Evolutionary stages of a single star and the groupings the binary
//! resolvers branch on.

use serde::{Deserialize, Serialize};

/// Evolutionary stage of a star or stellar remnant.
///
/// Follows the Hurley, Pols & Tout (2000) classification, extended with
/// chemically homogeneous main-sequence stars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StellarType {
    /// Deeply or fully convective main sequence, M ≤ 0.7 M☉
    MainSequenceLowMass,
    /// Main sequence, M > 0.7 M☉
    MainSequence,
    HertzsprungGap,
    FirstGiantBranch,
    CoreHeliumBurning,
    EarlyAsymptoticGiantBranch,
    ThermallyPulsingAsymptoticGiantBranch,
    NakedHeliumStarMainSequence,
    NakedHeliumStarHertzsprungGap,
    NakedHeliumStarGiantBranch,
    HeliumWhiteDwarf,
    CarbonOxygenWhiteDwarf,
    OxygenNeonWhiteDwarf,
    NeutronStar,
    BlackHole,
    MasslessRemnant,
    /// Rapidly rotating, fully mixed main-sequence star
    ChemicallyHomogeneous,
}

impl StellarType {
    /// Hydrogen-burning main sequence, including chemically homogeneous stars
    pub fn is_main_sequence(self) -> bool {
        matches!(
            self,
            Self::MainSequenceLowMass | Self::MainSequence | Self::ChemicallyHomogeneous
        )
    }

    /// Any core-burning main sequence, hydrogen or naked helium
    pub fn is_any_main_sequence(self) -> bool {
        self.is_main_sequence() || self == Self::NakedHeliumStarMainSequence
    }

    /// Hertzsprung gap, hydrogen or naked helium
    pub fn is_any_hertzsprung_gap(self) -> bool {
        matches!(
            self,
            Self::HertzsprungGap | Self::NakedHeliumStarHertzsprungGap
        )
    }

    /// Giant branch stages with a deep convective envelope
    pub fn is_giant(self) -> bool {
        matches!(
            self,
            Self::FirstGiantBranch
                | Self::CoreHeliumBurning
                | Self::EarlyAsymptoticGiantBranch
                | Self::ThermallyPulsingAsymptoticGiantBranch
        )
    }

    pub fn is_naked_helium_star(self) -> bool {
        matches!(
            self,
            Self::NakedHeliumStarMainSequence
                | Self::NakedHeliumStarHertzsprungGap
                | Self::NakedHeliumStarGiantBranch
        )
    }

    /// Stripped helium stars past core helium burning (case BB donors)
    pub fn is_evolved_naked_helium_star(self) -> bool {
        matches!(
            self,
            Self::NakedHeliumStarHertzsprungGap | Self::NakedHeliumStarGiantBranch
        )
    }

    pub fn is_white_dwarf(self) -> bool {
        matches!(
            self,
            Self::HeliumWhiteDwarf | Self::CarbonOxygenWhiteDwarf | Self::OxygenNeonWhiteDwarf
        )
    }

    /// Neutron star or black hole
    pub fn is_neutron_star_or_black_hole(self) -> bool {
        matches!(self, Self::NeutronStar | Self::BlackHole)
    }

    /// White dwarfs, neutron stars and black holes
    pub fn is_degenerate(self) -> bool {
        self.is_white_dwarf() || self.is_neutron_star_or_black_hole()
    }

    /// Degenerate remnants plus massless remnants
    pub fn is_compact_object(self) -> bool {
        self.is_degenerate() || self == Self::MasslessRemnant
    }

    /// Short label used in event records
    pub fn label(self) -> &'static str {
        match self {
            Self::MainSequenceLowMass => "MS_LTE_07",
            Self::MainSequence => "MS_GT_07",
            Self::HertzsprungGap => "HG",
            Self::FirstGiantBranch => "FGB",
            Self::CoreHeliumBurning => "CHeB",
            Self::EarlyAsymptoticGiantBranch => "EAGB",
            Self::ThermallyPulsingAsymptoticGiantBranch => "TPAGB",
            Self::NakedHeliumStarMainSequence => "HeMS",
            Self::NakedHeliumStarHertzsprungGap => "HeHG",
            Self::NakedHeliumStarGiantBranch => "HeGB",
            Self::HeliumWhiteDwarf => "HeWD",
            Self::CarbonOxygenWhiteDwarf => "COWD",
            Self::OxygenNeonWhiteDwarf => "ONeWD",
            Self::NeutronStar => "NS",
            Self::BlackHole => "BH",
            Self::MasslessRemnant => "MR",
            Self::ChemicallyHomogeneous => "CH",
        }
    }

    /// Main-sequence type appropriate for a zero-age mass in M☉
    pub fn main_sequence_for_mass(zams_mass: f64) -> Self {
        if zams_mass <= 0.7 {
            Self::MainSequenceLowMass
        } else {
            Self::MainSequence
        }
    }
}

impl std::fmt::Display for StellarType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
