//! Desirability score per type set. The built-in table covers every mono and
//! dual set; a JSON file can replace it, but it must be just as complete.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::types::{TypeParseError, TypeSet};

/// Factor applied to every built-in raw score.
pub const SCORE_SCALE: f64 = 84.99320358985798;

/// Raw scores in [TypeSet::all] order.
#[rustfmt::skip]
const RAW_SCORES: [f64; 171] = [
    0.06099708268989983, 0.07609668309797292, 0.07755098162773733,
    0.07528787581726906, 0.06697917958709365, 0.07042041698182097,
    0.06875172446240499, 0.0694707402033407, 0.07871372802753264,
    0.07323443566449268, 0.0734142231474166, 0.06896843606909984,
    0.07081173266313882, 0.08114435019846389, 0.06949257906575437,
    0.07174329343762528, 0.08051413755887118, 0.07707333217963225,
    0.07196733599403997, 0.0822145977462367, 0.08048466345048298,
    0.08008416541007814, 0.07670186749098513, 0.08061798471687527,
    0.07624386645555797, 0.08776581339080189, 0.08024170636459432,
    0.07842869458115684, 0.07642054379060188, 0.07792274132754143,
    0.08149382555217943, 0.08108635221014555, 0.07972598994678298,
    0.08132764024997748, 0.08290273705547217, 0.0738765670814289,
    0.08110635890290156, 0.07508760465680409, 0.07865085111906754,
    0.07859748991628117, 0.08329739091634021, 0.08586540296305616,
    0.08410507231498227, 0.07687230328350217, 0.0801906595523224,
    0.07886822172722424, 0.08264157449142727, 0.0814419756756884,
    0.07794116333602953, 0.0849322782015798, 0.08497007083544503,
    0.06678378352588568, 0.07200421919651631, 0.07786109803338916,
    0.07985640838887952, 0.07850646723260973, 0.08157617127878836,
    0.08188212837484066, 0.07501370307342767, 0.07833342663429348,
    0.07490521478869988, 0.08075201112892263, 0.07545277752902801,
    0.07617804292105185, 0.08276417416423272, 0.08279844458345843,
    0.058479650323857144, 0.06882502896388686, 0.06990635907412243,
    0.0720162836569761, 0.0751690925656788, 0.07250924800380361,
    0.06729986899770189, 0.06367756447029613, 0.07887237159370081,
    0.07510174996932503, 0.06778473297611413, 0.06840617970572468,
    0.08060977514310849, 0.07258065142641656, 0.06742960171786011,
    0.07712075551199601, 0.07309356241777559, 0.08328799877661246,
    0.07467707845151807, 0.07190280073272544, 0.06998267673901543,
    0.0729180612295194, 0.07779417834499505, 0.07363459971828158,
    0.07156548921918267, 0.07870948133566741, 0.07463488832787037,
    0.06321328111252883, 0.07674894157543237, 0.07688275392825408,
    0.07996061595312456, 0.0798324598502394, 0.07149471645065407,
    0.07753706634621016, 0.08252510264731804, 0.07615511893099207,
    0.0799705242159704, 0.08384228267601063, 0.07746595217275272,
    0.060234744856404975, 0.08264010941333622, 0.07383745923351437,
    0.07404715678160786, 0.06839276056828127, 0.07450480629943806,
    0.0774863885360134, 0.0749698346445271, 0.08246788120157773,
    0.08028592588010074, 0.0766080953530492, 0.07045358537239108,
    0.08810992765207135, 0.0769272423378444, 0.0805176476562979,
    0.07805291628650511, 0.08218445669214106, 0.08055778315435881,
    0.07872338504481863, 0.08777148225173652, 0.08603398554434964,
    0.07084952962955093, 0.07216009079421647, 0.07043408885235967,
    0.07825149419582203, 0.07807127149925701, 0.07453908951312235,
    0.0785742841357946, 0.0877414002549554, 0.07599463821579963,
    0.06406699776010721, 0.0709343621377375, 0.07312945035075082,
    0.07548329195052206, 0.07054281590450659, 0.07562311940066314,
    0.0800874072809677, 0.07677641573068052, 0.060195549536478946,
    0.07804257315381534, 0.07538857286678381, 0.06987853232264757,
    0.0703298589130096, 0.08238821557889091, 0.07149056170545819,
    0.06907626168614014, 0.07761792265398405, 0.07472088730144642,
    0.07261858900072435, 0.07997836046033566, 0.07979248624314776,
    0.06877145970112279, 0.07811837052886945, 0.07902191370033665,
    0.08683098360112304, 0.08386573523321612, 0.06552424292032369,
    0.07245435691951418, 0.08577940828226004, 0.07801175394504743,
    0.06833136120136728, 0.08403167536389736, 0.08080831490852695,
    0.07289999294553741, 0.08771094821357792, 0.07311026857313073,
];

#[derive(Debug, Error)]
pub enum ScoreError {
    #[error("incomplete score data: no score for type set '{0}'")]
    Incomplete(TypeSet),
    #[error("failed to read score table '{path}': {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse score table '{path}': {source}")]
    Parse {
        path: String,
        source: serde_json::Error,
    },
    #[error("score table key '{key}' repeats type set '{set}'")]
    DuplicateKey { key: String, set: TypeSet },
    #[error("invalid score table key '{key}': {source}")]
    Key {
        key: String,
        source: TypeParseError,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScoreTable {
    scores: HashMap<TypeSet, f64>,
}

impl ScoreTable {
    pub fn standard() -> Self {
        let scores = TypeSet::all()
            .zip(RAW_SCORES.iter())
            .map(|(set, raw)| (set, raw * SCORE_SCALE))
            .collect();
        Self { scores }
    }

    /// Builds a table and rejects it unless every type set has exactly one score.
    pub fn from_entries<I>(entries: I) -> Result<Self, ScoreError>
    where
        I: IntoIterator<Item = (TypeSet, f64)>,
    {
        let mut scores = HashMap::new();
        for (set, score) in entries {
            if scores.insert(set, score).is_some() {
                return Err(ScoreError::DuplicateKey {
                    key: set.to_string(),
                    set,
                });
            }
        }
        if let Some(missing) = TypeSet::all().find(|set| !scores.contains_key(set)) {
            return Err(ScoreError::Incomplete(missing));
        }
        Ok(Self { scores })
    }

    /// Loads a JSON object mapping `"fire"` / `"fire/water"` keys to scores.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, ScoreError> {
        let path = path.as_ref();
        let display = path.display().to_string();
        let raw = fs::read_to_string(path).map_err(|source| ScoreError::Read {
            path: display.clone(),
            source,
        })?;
        let parsed: BTreeMap<String, f64> =
            serde_json::from_str(&raw).map_err(|source| ScoreError::Parse {
                path: display,
                source,
            })?;

        // "water/fire" and "fire/water" name the same set; report the key as written
        let mut seen = HashSet::new();
        let mut entries = Vec::with_capacity(parsed.len());
        for (key, score) in parsed {
            let set = match key.parse::<TypeSet>() {
                Ok(set) => set,
                Err(source) => return Err(ScoreError::Key { key, source }),
            };
            if !seen.insert(set) {
                return Err(ScoreError::DuplicateKey { key, set });
            }
            entries.push((set, score));
        }
        let table = Self::from_entries(entries)?;
        log::debug!("loaded {} scores from {}", table.len(), path.display());
        Ok(table)
    }

    pub fn score(&self, set: &TypeSet) -> Result<f64, ScoreError> {
        self.scores
            .get(set)
            .copied()
            .ok_or(ScoreError::Incomplete(*set))
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }
}

impl Default for ScoreTable {
    fn default() -> Self {
        Self::standard()
    }
}
