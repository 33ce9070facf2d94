//! Distance command - great-circle distance between two points.

use clap::Args;

use canalguide::geo::{distance_meters, initial_bearing_degrees, Coordinate};

use crate::error::CliError;

/// Arguments for the distance command.
#[derive(Debug, Args)]
pub struct DistanceArgs {
    /// Start point as "lat,lng"
    #[arg(allow_hyphen_values = true)]
    pub from: String,

    /// End point as "lat,lng"
    #[arg(allow_hyphen_values = true)]
    pub to: String,
}

/// Run the distance command.
pub fn run(args: DistanceArgs) -> Result<(), CliError> {
    let from = parse_coordinate(&args.from)?;
    let to = parse_coordinate(&args.to)?;

    println!("Distance: {:.1} m", distance_meters(&from, &to));
    if from != to {
        println!("Bearing:  {:.1}°", initial_bearing_degrees(&from, &to));
    }
    Ok(())
}

fn parse_coordinate(text: &str) -> Result<Coordinate, CliError> {
    text.parse()
        .map_err(|e| CliError::Config(format!("'{}': {}", text, e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_coordinate() {
        let coord = parse_coordinate("52.3752, 4.8840").unwrap();
        assert_eq!(coord, Coordinate::new(52.3752, 4.8840));
    }

    #[test]
    fn test_parse_coordinate_negative() {
        let coord = parse_coordinate("-33.8568,151.2153").unwrap();
        assert!(coord.latitude < 0.0);
    }

    #[test]
    fn test_parse_coordinate_rejects_garbage() {
        assert!(matches!(
            parse_coordinate("not a place"),
            Err(CliError::Config(_))
        ));
    }
}
