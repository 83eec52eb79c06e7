mod tests {
    use approx::assert_relative_eq;

    use crate::length::{AU_TO_KM, Length, SOLAR_RADIUS_AU};

    #[test]
    fn test_solar_radius_conversions() {
        let radius = Length::from_solar_radii(1.0);
        assert_relative_eq!(radius.to_au(), SOLAR_RADIUS_AU);
        assert_relative_eq!(radius.to_solar_radii(), 1.0);

        let one_au = Length::from_au(1.0);
        assert_relative_eq!(one_au.to_solar_radii(), 215.032, epsilon = 1e-9);
    }

    #[test]
    fn test_km_and_meter_conversions() {
        let one_au = Length::from_km(AU_TO_KM);
        assert_relative_eq!(one_au.to_au(), 1.0);
        assert_relative_eq!(one_au.to_meters(), 1.495_978_707e11);
        assert_relative_eq!(Length::from_meters(1.0e3).to_km(), 1.0);
    }

    #[test]
    fn test_length_arithmetic_operations() {
        let periastron = Length::from_au(10.0) * (1.0 - 0.3);
        assert_relative_eq!(periastron.to_au(), 7.0);

        let sum = Length::from_au(5.0) + Length::from_au(3.0);
        assert_relative_eq!(sum.to_au(), 8.0);
        assert_relative_eq!((sum - Length::from_au(2.0)).to_au(), 6.0);
        assert_relative_eq!(Length::from_au(6.0) / Length::from_au(3.0), 2.0);
        assert_relative_eq!((0.5 * sum).to_au(), 4.0);
    }

    #[test]
    fn test_not_applicable_length() {
        assert!(Length::not_applicable().is_nan());
        assert!(!Length::zero().is_nan());
    }
}
