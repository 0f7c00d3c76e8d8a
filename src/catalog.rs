//! Catalogues statiques S-57
//!
//! Deux tables code -> acronyme: les classes d'objets (OBJL), compilées dans
//! le binaire, et le catalogue d'attributs, chargé paresseusement depuis une
//! ressource CSV embarquée. Les deux sont des constantes de processus; les
//! lectures concurrentes sont sûres.

use std::collections::HashMap;
use std::sync::OnceLock;

use crate::error::S57Error;

/// Catalogue d'attributs S-57 (Appendice A chapitre 2), colonnes:
/// code numérique, nom descriptif, acronyme, colonnes de queue ignorées
const ATTRIBUTES_CSV: &str = include_str!("../assets/s57attributes.csv");

static ATTRIBUTE_NAMES: OnceLock<HashMap<u16, String>> = OnceLock::new();

/// Acronyme d'une classe d'objet (ex: 42 -> "DEPARE").
///
/// Un code inconnu donne le nom littéral `OBJL_<code>`: jamais une erreur à
/// ce niveau, le filtrage est le choix de l'appelant. Seul un code nul est
/// rejeté (OBJL invalide).
pub fn object_class_name(code: u16) -> Result<String, S57Error> {
    if code == 0 {
        return Err(S57Error::UnknownObjectClass(i32::from(code)));
    }
    match object_class_acronym(code) {
        Some(acronym) => Ok(acronym.to_string()),
        None => Ok(format!("OBJL_{code}")),
    }
}

/// Acronyme d'un code d'attribut (ex: 87 -> "DRVAL1"),
/// `ATTR_<code>` pour un code hors catalogue
pub fn attribute_acronym(code: u16) -> String {
    match attribute_table().get(&code) {
        Some(acronym) => acronym.clone(),
        None => format!("ATTR_{code}"),
    }
}

fn attribute_table() -> &'static HashMap<u16, String> {
    ATTRIBUTE_NAMES.get_or_init(load_attribute_names)
}

/// Charge le catalogue d'attributs depuis la ressource CSV embarquée
fn load_attribute_names() -> HashMap<u16, String> {
    let mut names = HashMap::new();

    // Première ligne: en-tête
    for line in ATTRIBUTES_CSV.lines().skip(1) {
        let fields = split_csv_line(line);
        if fields.len() < 3 {
            continue;
        }
        let Ok(code) = fields[0].trim().parse::<u16>() else {
            continue;
        };
        let acronym = fields[2].trim();
        if !acronym.is_empty() {
            names.insert(code, acronym.to_string());
        }
    }

    names
}

/// Découpe une ligne CSV; les champs peuvent être entre guillemets doubles
fn split_csv_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    for c in line.chars() {
        match c {
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => fields.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    fields.push(current);

    fields
}

/// Table des classes d'objets S-57 Edition 3.1 (Appendice A, catalogue d'objets)
fn object_class_acronym(code: u16) -> Option<&'static str> {
    let acronym = match code {
        1 => "ADMARE",
        2 => "AIRARE",
        3 => "ACHBRT",
        4 => "ACHARE",
        5 => "BCNCAR",
        6 => "BCNISD",
        7 => "BCNLAT",
        8 => "BCNSAW",
        9 => "BCNSPP",
        10 => "BERTHS",
        11 => "BRIDGE",
        12 => "BUISGL",
        13 => "BUAARE",
        14 => "BOYCAR",
        15 => "BOYINB",
        16 => "BOYISD",
        17 => "BOYLAT",
        18 => "BOYSAW",
        19 => "BOYSPP",
        20 => "CBLARE",
        21 => "CBLOHD",
        22 => "CBLSUB",
        23 => "CANALS",
        24 => "CANBNK",
        25 => "CTSARE",
        26 => "CAUSWY",
        27 => "CTNARE",
        28 => "CHKPNT",
        29 => "CGUSTA",
        30 => "COALNE",
        31 => "CONZNE",
        32 => "COSARE",
        33 => "CTRPNT",
        34 => "CONVYR",
        35 => "CRANES",
        36 => "CURENT",
        37 => "CUSZNE",
        38 => "DAMCON",
        39 => "DAYMAR",
        40 => "DWRTCL",
        41 => "DWRTPT",
        42 => "DEPARE",
        43 => "DEPCNT",
        44 => "DISMAR",
        45 => "DOCARE",
        46 => "DRGARE",
        47 => "DRYDOC",
        48 => "DMPGRD",
        49 => "DYKCON",
        50 => "EXEZNE",
        51 => "FAIRWY",
        52 => "FNCLNE",
        53 => "FERYRT",
        54 => "FSHZNE",
        55 => "FSHFAC",
        56 => "FSHGRD",
        57 => "FLODOC",
        58 => "FOGSIG",
        59 => "FORSTC",
        60 => "FRPARE",
        61 => "GATCON",
        62 => "GRIDRN",
        63 => "HRBARE",
        64 => "HRBFAC",
        65 => "HULKES",
        66 => "ICEARE",
        67 => "ICNARE",
        68 => "ISTZNE",
        69 => "LAKARE",
        70 => "LAKSHR",
        71 => "LNDARE",
        72 => "LNDELV",
        73 => "LNDRGN",
        74 => "LNDMRK",
        75 => "LIGHTS",
        76 => "LITFLT",
        77 => "LITVES",
        78 => "LOCMAG",
        79 => "LOKBSN",
        80 => "LOGPON",
        81 => "MAGVAR",
        82 => "MARCUL",
        83 => "MIPARE",
        84 => "MORFAC",
        85 => "NAVLNE",
        86 => "OBSTRN",
        87 => "OFSPLF",
        88 => "OSPARE",
        89 => "OILBAR",
        90 => "PILPNT",
        91 => "PILBOP",
        92 => "PIPARE",
        93 => "PIPOHD",
        94 => "PIPSOL",
        95 => "PONTON",
        96 => "PRCARE",
        97 => "PRDARE",
        98 => "PYLONS",
        99 => "RADLNE",
        100 => "RADRNG",
        101 => "RADRFL",
        102 => "RADSTA",
        103 => "RTPBCN",
        104 => "RDOCAL",
        105 => "RDOSTA",
        106 => "RAILWY",
        107 => "RAPIDS",
        108 => "RCRTCL",
        109 => "RECTRC",
        110 => "RCTLPT",
        111 => "RSCSTA",
        112 => "RESARE",
        113 => "RETRFL",
        114 => "RIVERS",
        115 => "RIVBNK",
        116 => "ROADWY",
        117 => "RUNWAY",
        118 => "SNDWAV",
        119 => "SEAARE",
        120 => "SPLARE",
        121 => "SBDARE",
        122 => "SLCONS",
        123 => "SISTAT",
        124 => "SISTAW",
        125 => "SILTNK",
        126 => "SLOTOP",
        127 => "SLOGRD",
        128 => "SMCFAC",
        129 => "SOUNDG",
        130 => "SPRING",
        131 => "SQUARE",
        132 => "STSLNE",
        133 => "SUBTLN",
        134 => "SWPARE",
        135 => "TESARE",
        136 => "TS_PRH",
        137 => "TS_PNH",
        138 => "TS_PAD",
        139 => "TS_TIS",
        140 => "T_HMON",
        141 => "T_NHMN",
        142 => "T_TIMS",
        143 => "TIDEWY",
        144 => "TOPMAR",
        145 => "TSELNE",
        146 => "TSSBND",
        147 => "TSSCRS",
        148 => "TSSLPT",
        149 => "TSSRON",
        150 => "TSEZNE",
        151 => "TUNNEL",
        152 => "TWRTPT",
        153 => "UWTROC",
        154 => "UNSARE",
        155 => "VEGATN",
        156 => "WATTUR",
        157 => "WATFAL",
        158 => "WEDKLP",
        159 => "WRECKS",
        300 => "M_ACCY",
        301 => "M_CSCL",
        302 => "M_COVR",
        303 => "M_HDAT",
        304 => "M_HOPA",
        305 => "M_NPUB",
        306 => "M_NSYS",
        307 => "M_PROD",
        308 => "M_QUAL",
        309 => "M_SDAT",
        310 => "M_SREL",
        311 => "M_UNIT",
        312 => "M_VDAT",
        400 => "C_AGGR",
        401 => "C_ASSO",
        402 => "C_STAC",
        _ => return None,
    };
    Some(acronym)
}
