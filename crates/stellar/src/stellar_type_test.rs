use crate::stellar_type::StellarType;

#[test]
fn main_sequence_groups() {
    assert!(StellarType::ChemicallyHomogeneous.is_main_sequence());
    assert!(!StellarType::NakedHeliumStarMainSequence.is_main_sequence());
    assert!(StellarType::NakedHeliumStarMainSequence.is_any_main_sequence());
    assert!(!StellarType::HertzsprungGap.is_any_main_sequence());
}

#[test]
fn compact_objects_include_massless_remnants() {
    for stellar_type in [
        StellarType::HeliumWhiteDwarf,
        StellarType::CarbonOxygenWhiteDwarf,
        StellarType::OxygenNeonWhiteDwarf,
        StellarType::NeutronStar,
        StellarType::BlackHole,
    ] {
        assert!(stellar_type.is_degenerate(), "{} should be degenerate", stellar_type);
        assert!(stellar_type.is_compact_object());
    }
    assert!(StellarType::MasslessRemnant.is_compact_object());
    assert!(!StellarType::MasslessRemnant.is_degenerate());
}

#[test]
fn case_bb_donors() {
    assert!(StellarType::NakedHeliumStarHertzsprungGap.is_evolved_naked_helium_star());
    assert!(StellarType::NakedHeliumStarGiantBranch.is_evolved_naked_helium_star());
    assert!(!StellarType::NakedHeliumStarMainSequence.is_evolved_naked_helium_star());
    assert!(StellarType::NakedHeliumStarHertzsprungGap.is_any_hertzsprung_gap());
}

#[test]
fn main_sequence_split_at_point_seven() {
    assert_eq!(
        StellarType::main_sequence_for_mass(0.7),
        StellarType::MainSequenceLowMass
    );
    assert_eq!(
        StellarType::main_sequence_for_mass(0.71),
        StellarType::MainSequence
    );
    assert_eq!(StellarType::BlackHole.to_string(), "BH");
}
