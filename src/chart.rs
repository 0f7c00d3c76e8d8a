//! La carte assemblée: métadonnées, features, emprise

use std::fmt;

use crate::catalog;
use crate::error::S57Error;
use crate::geometry;
use crate::records::dsid::DatasetMetadata;
use crate::records::dspm::DatasetParams;
use crate::records::ChartData;
use crate::types::{AttributeValue, Bounds, Feature};
use crate::validation;
use crate::ParseOptions;

/// Bande d'usage ENC (usage prévu INTU du DSID).
///
/// Les cellules sont organisées par bande d'usage, qui détermine le niveau
/// de détail et l'échelle d'affichage appropriée.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UsageBand {
    Unknown,
    /// ≥ 1:1 500 000: planification de route
    Overview,
    /// 1:350 000 – 1:1 500 000: navigation hauturière
    General,
    /// 1:90 000 – 1:350 000: navigation côtière
    Coastal,
    /// 1:22 000 – 1:90 000: approches portuaires
    Approach,
    /// 1:4 000 – 1:22 000: navigation portuaire
    Harbour,
    /// ≤ 1:4 000: accostage
    Berthing,
}

impl UsageBand {
    pub fn from_intu(intu: u8) -> Self {
        match intu {
            1 => UsageBand::Overview,
            2 => UsageBand::General,
            3 => UsageBand::Coastal,
            4 => UsageBand::Approach,
            5 => UsageBand::Harbour,
            6 => UsageBand::Berthing,
            _ => UsageBand::Unknown,
        }
    }

    /// Plage d'échelles recommandée (dénominateurs), 0 pour une borne ouverte
    pub fn scale_range(self) -> (u32, u32) {
        match self {
            UsageBand::Overview => (1_500_000, 0),
            UsageBand::General => (350_000, 1_500_000),
            UsageBand::Coastal => (90_000, 350_000),
            UsageBand::Approach => (22_000, 90_000),
            UsageBand::Harbour => (4_000, 22_000),
            UsageBand::Berthing => (0, 4_000),
            UsageBand::Unknown => (0, 0),
        }
    }
}

impl fmt::Display for UsageBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            UsageBand::Overview => "Overview",
            UsageBand::General => "General",
            UsageBand::Coastal => "Coastal",
            UsageBand::Approach => "Approach",
            UsageBand::Harbour => "Harbour",
            UsageBand::Berthing => "Berthing",
            UsageBand::Unknown => "Unknown",
        };
        write!(f, "{name}")
    }
}

/// Une carte électronique de navigation S-57 complètement assemblée.
///
/// Les features préservent l'ordre de rencontre de la cellule de base; les
/// insertions des révisions s'ajoutent en fin, les modifications remplacent
/// sur place, les suppressions compactent.
#[derive(Debug)]
pub struct Chart {
    metadata: DatasetMetadata,
    params: DatasetParams,
    features: Vec<Feature>,
    bounds: Bounds,
}

impl Chart {
    /// Toutes les features de la carte
    pub fn features(&self) -> &[Feature] {
        &self.features
    }

    pub fn feature_count(&self) -> usize {
        self.features.len()
    }

    /// Emprise géographique de la carte.
    ///
    /// L'emprise des features de méta-couverture M_COVR fait foi quand elle
    /// existe (c'est la couverture officielle de la cellule), sinon l'union
    /// des emprises de toutes les features.
    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// Features dont l'emprise intersecte la boîte donnée (parcours
    /// linéaire; un index spatial relève de l'appelant)
    pub fn features_in_bounds(&self, bounds: &Bounds) -> Vec<&Feature> {
        self.features
            .iter()
            .filter(|feature| {
                feature
                    .geometry
                    .bounds()
                    .is_some_and(|fb| bounds.intersects(&fb))
            })
            .collect()
    }

    /// Nom du jeu de données: identifiant de cellule (ex: "GB5X01NE")
    pub fn dataset_name(&self) -> &str {
        &self.metadata.dsnm
    }

    /// Numéro d'édition
    pub fn edition(&self) -> &str {
        &self.metadata.edtn
    }

    /// Numéro de mise à jour: "0" pour une cellule de base, le numéro de la
    /// dernière révision appliquée sinon
    pub fn update_number(&self) -> &str {
        &self.metadata.updn
    }

    /// Date d'application des mises à jour (AAAAMMJJ)
    pub fn update_date(&self) -> &str {
        &self.metadata.uadt
    }

    /// Date de publication (AAAAMMJJ)
    pub fn issue_date(&self) -> &str {
        &self.metadata.isdt
    }

    /// Édition du standard S-57 (ex: "03.1")
    pub fn s57_edition(&self) -> &str {
        &self.metadata.sted
    }

    /// Code de l'agence productrice
    pub fn producing_agency(&self) -> u16 {
        self.metadata.agen
    }

    /// Commentaire libre du DSID
    pub fn comment(&self) -> &str {
        &self.metadata.comt
    }

    /// But de l'échange, lisible
    pub fn exchange_purpose(&self) -> &'static str {
        match self.metadata.expp {
            1 => "New",
            2 => "Revision",
            _ => "Unknown",
        }
    }

    /// Spécification de produit, lisible
    pub fn product_specification(&self) -> &'static str {
        match self.metadata.prsp {
            1 => "ENC",
            2 => "ODD",
            _ => "Unknown",
        }
    }

    /// Profil d'application, lisible
    pub fn application_profile(&self) -> &'static str {
        match self.metadata.prof {
            1 => "EN (ENC New)",
            2 => "ER (ENC Revision)",
            3 => "DD (Data Dictionary)",
            _ => "Unknown",
        }
    }

    /// Usage prévu brut (1..6)
    pub fn intended_usage(&self) -> u8 {
        self.metadata.intu
    }

    /// Bande d'usage dérivée de l'usage prévu
    pub fn usage_band(&self) -> UsageBand {
        UsageBand::from_intu(self.metadata.intu)
    }

    /// Unité de coordonnées (COUN: 1 = lat/lon, 2 = projeté)
    pub fn coordinate_units(&self) -> u8 {
        self.params.coun
    }

    /// Datum géodésique horizontal (HDAT: 2 = WGS-84)
    pub fn horizontal_datum(&self) -> u8 {
        self.params.hdat
    }

    /// Dénominateur de l'échelle de compilation (CSCL), 0 si non renseigné
    pub fn compilation_scale(&self) -> i32 {
        self.params.cscl
    }
}

/// Assemble la carte finale: géométries, filtrage, validation, emprise
pub(crate) fn build(data: ChartData, options: &ParseOptions) -> Result<Chart, S57Error> {
    let mut features = Vec::with_capacity(data.features.len());

    for record in &data.features {
        let object_class = catalog::object_class_name(record.object_class);

        // Le filtre s'applique avant tout le reste: une feature écartée ne
        // déclenche ni construction ni erreur de classe
        if !options.object_class_filter.is_empty() {
            let keep = match &object_class {
                Ok(name) => options.object_class_filter.iter().any(|w| w == name),
                Err(_) => false,
            };
            if !keep {
                continue;
            }
        }

        let object_class = match object_class {
            Ok(name) => name,
            Err(error) => {
                if options.skip_unknown_features {
                    continue;
                }
                return Err(error);
            }
        };

        let geometry = match geometry::construct(record, &data.spatial) {
            Ok(geometry) => geometry,
            Err(error) => {
                if options.skip_unknown_features {
                    continue;
                }
                return Err(error);
            }
        };

        if options.validate_geometry {
            if let Err(error) = validation::validate_geometry(&geometry, record.id) {
                if options.skip_unknown_features {
                    continue;
                }
                return Err(error);
            }
        }

        let mut attributes = record.attributes.clone();
        if object_class == "SOUNDG" {
            let depths: Vec<f64> = geometry
                .positions()
                .iter()
                .filter_map(|p| p.depth)
                .collect();
            if !depths.is_empty() {
                attributes.insert("DEPTHS".to_string(), AttributeValue::Numbers(depths));
            }
        }

        features.push(Feature {
            id: record.id,
            foid: record.key,
            object_class,
            geometry,
            attributes,
        });
    }

    let bounds = compute_bounds(&features);

    Ok(Chart {
        metadata: data.metadata,
        params: data.params,
        features,
        bounds,
    })
}

fn compute_bounds(features: &[Feature]) -> Bounds {
    let mut coverage: Option<Bounds> = None;
    let mut all: Option<Bounds> = None;

    for feature in features {
        let Some(feature_bounds) = feature.geometry.bounds() else {
            continue;
        };
        all = Some(match all {
            Some(current) => current.union(&feature_bounds),
            None => feature_bounds,
        });
        if feature.object_class == "M_COVR" {
            coverage = Some(match coverage {
                Some(current) => current.union(&feature_bounds),
                None => feature_bounds,
            });
        }
    }

    coverage.or(all).unwrap_or_default()
}
