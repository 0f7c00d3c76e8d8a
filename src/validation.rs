//! Contrôles de cohérence des coordonnées et géométries

use crate::error::S57Error;
use crate::types::{Geometry, Position};

/// Vérifie qu'une position est dans les bornes géographiques valides.
/// La profondeur n'est pas contrainte (elle peut être négative, un haut-fond
/// découvrant par exemple).
pub fn validate_position(position: &Position) -> Result<(), S57Error> {
    if position.lat < -90.0 || position.lat > 90.0 || position.lon < -180.0 || position.lon > 180.0
    {
        return Err(S57Error::InvalidCoordinate {
            lat: position.lat,
            lon: position.lon,
        });
    }
    Ok(())
}

/// Valide une géométrie assemblée.
///
/// Une géométrie vide est acceptée: les méta-features (PRIM=255) n'ont pas
/// de représentation spatiale, et les géométries dégénérées issues de
/// données amont défectueuses ont été vidées par la construction plutôt que
/// de faire échouer la carte entière.
pub fn validate_geometry(geometry: &Geometry, feature_id: i64) -> Result<(), S57Error> {
    for (index, position) in geometry.positions().iter().enumerate() {
        if let Err(error) = validate_position(position) {
            return Err(S57Error::invalid_geometry(
                feature_id,
                format!("coordinate {index} invalid: {error}"),
            ));
        }
    }
    Ok(())
}
