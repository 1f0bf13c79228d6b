//! Tunable engine parameters.
//!
//! [`Parameters`] groups every weight and threshold the engine uses into
//! three sections: `eval` (static evaluation), `search` (search control) and
//! `management` (table sizes, aging, time management). The section doubles as
//! the parameter kind reported by [`Parameters::names`].
//!
//! Parameters load from TOML, serialize back to TOML, and can be read or
//! written one at a time by dotted path:
//!
//! ```
//! use chess_search::Parameters;
//!
//! let mut params = Parameters::default();
//! params.set("search.null_move_reduction", 2.into()).unwrap();
//! assert_eq!(params.search.null_move_reduction, 2);
//! assert_eq!(params.get("search.null_move_reduction").unwrap(), 2);
//! ```

use crate::error::ParamError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;
use std::str::FromStr;

/// A middlegame / endgame weight pair, blended by game phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Taper {
    pub mg: i32,
    pub eg: i32,
}

impl Taper {
    pub const fn new(mg: i32, eg: i32) -> Self {
        Taper { mg, eg }
    }
}

/// Centipawn values for the five capturable piece types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PieceValues {
    pub pawn: i32,
    pub knight: i32,
    pub bishop: i32,
    pub rook: i32,
    pub queen: i32,
}

impl PieceValues {
    /// Value indexed by piece, with the king worth nothing.
    pub fn as_array(&self) -> [i32; 6] {
        [self.pawn, self.knight, self.bishop, self.rook, self.queen, 0]
    }
}

/// Piece-square tables, 64 entries each, written from White's point of view
/// with rank 8 on the first row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PieceTables {
    pub pawn: Vec<i32>,
    pub knight: Vec<i32>,
    pub bishop: Vec<i32>,
    pub rook: Vec<i32>,
    pub queen: Vec<i32>,
    pub king: Vec<i32>,
}

impl PieceTables {
    /// Tables indexed by piece.
    pub fn as_array(&self) -> [&[i32]; 6] {
        [
            &self.pawn,
            &self.knight,
            &self.bishop,
            &self.rook,
            &self.queen,
            &self.king,
        ]
    }
}

/// Tapered weights for the four non-pawn, non-king piece types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PieceWeights {
    pub knight: Taper,
    pub bishop: Taper,
    pub rook: Taper,
    pub queen: Taper,
}

impl PieceWeights {
    /// Weight indexed by piece; pawns and kings get zero.
    pub fn as_array(&self) -> [Taper; 6] {
        [
            Taper::default(),
            self.knight,
            self.bishop,
            self.rook,
            self.queen,
            Taper::default(),
        ]
    }
}

/// Static evaluation weights. All terms are in centipawns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvalParams {
    pub material_mg: PieceValues,
    pub material_eg: PieceValues,
    pub pst_mg: PieceTables,
    pub pst_eg: PieceTables,
    /// Passed pawn bonus by relative rank (index 0 is the back rank).
    pub passed_pawn_mg: Vec<i32>,
    pub passed_pawn_eg: Vec<i32>,
    pub isolated_pawn: Taper,
    pub backward_pawn: Taper,
    pub doubled_pawn: Taper,
    pub blocked_pawn: Taper,
    /// Bonus per reachable square not attacked by enemy pawns.
    pub mobility: PieceWeights,
    /// Penalty per enemy piece, scaled by its closeness to the king.
    pub king_tropism: PieceWeights,
    /// Bonus per friendly pawn directly in front of the king.
    pub pawn_shield: Taper,
    pub bishop_pair: Taper,
    /// Bonus for the side to move.
    pub tempo: i32,
}

/// Search control weights and thresholds.
///
/// Depths are in plies. Extensions are in eighths of a ply and accumulate
/// along a line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchParams {
    pub aspiration_min_depth: u32,
    pub aspiration_delta: i32,
    /// Past this window half-width the search falls back to a full window.
    pub aspiration_max_delta: i32,
    pub iid_min_depth: u32,
    pub iid_reduction: u32,
    pub null_move_min_depth: u32,
    pub null_move_reduction: u32,
    /// Depth from which the null-move reduction grows by one ply.
    pub null_move_deep_depth: u32,
    /// Depth from which a null-move cutoff is confirmed by a reduced search.
    pub null_verification_depth: u32,
    pub razor_margin: i32,
    pub futility_margin_d1: i32,
    pub futility_margin_d2: i32,
    pub lmr_min_depth: u32,
    /// Moves searched at full depth before reductions start.
    pub lmr_full_moves: u32,
    pub lmr_reduction: u32,
    /// Moves searched before the reduction grows by one more ply.
    pub lmr_deep_moves: u32,
    pub check_extension: i32,
    pub recapture_extension: i32,
    pub single_reply_extension: i32,
    pub mate_threat_extension: i32,
    /// Quiescence plies in which quiet checking moves are tried.
    pub qsearch_check_plies: u32,
    pub delta_margin: i32,
    pub pv_max_length: usize,
}

/// Engine management: table sizes, aging and time management.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ManagementParams {
    pub hash_mb: usize,
    pub eval_cache_mb: usize,
    /// Generations count modulo this value.
    pub generation_wrap: u8,
    /// Entries older than this many generations are dropped at search start.
    pub max_entry_age: u8,
    /// An occupant from the current generation survives a newcomer only if
    /// it is deeper by at least this many plies.
    pub replacement_margin: i32,
    /// History counters are halved when one exceeds this value.
    pub history_limit: u32,
    pub move_overhead_ms: u64,
    /// Moves-to-go assumed with all pieces on the board.
    pub moves_to_go_opening: u32,
    /// Moves-to-go assumed with only kings and pawns left.
    pub moves_to_go_endgame: u32,
    pub increment_percent: u32,
    /// Largest share of the remaining clock one move may use.
    pub max_budget_percent: u32,
    /// A new iteration starts only while less than this share of the budget
    /// has been used.
    pub iteration_start_percent: u32,
    /// Extra share of the budget granted once when the search is unstable.
    pub extension_percent: u32,
    pub score_swing_margin: i32,
    /// Best-move changes per hundred iterations counted as churn.
    pub churn_percent: u32,
    /// Iterations without a best-move change after which the search may
    /// take its extension.
    pub stale_iterations: u32,
}

/// All engine parameters, copied by value into each search.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Parameters {
    pub eval: EvalParams,
    pub search: SearchParams,
    pub management: ManagementParams,
}

/// The section a parameter belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamKind {
    Eval,
    Search,
    Management,
}

impl ParamKind {
    pub const ALL: [ParamKind; 3] = [ParamKind::Eval, ParamKind::Search, ParamKind::Management];

    /// Top-level TOML table holding parameters of this kind.
    pub const fn section(self) -> &'static str {
        match self {
            ParamKind::Eval => "eval",
            ParamKind::Search => "search",
            ParamKind::Management => "management",
        }
    }
}

impl FromStr for ParamKind {
    type Err = ParamError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ParamKind::ALL
            .into_iter()
            .find(|kind| kind.section() == s)
            .ok_or_else(|| ParamError::UnknownParameter(s.to_string()))
    }
}

impl Parameters {
    /// Loads parameters from a TOML file. Missing keys keep their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ParamError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parses parameters from a TOML string. Missing keys keep their defaults.
    pub fn from_toml(content: &str) -> Result<Self, ParamError> {
        let params: Parameters = toml::from_str(content)?;
        params.validate()?;
        Ok(params)
    }

    /// Serializes all parameters as TOML.
    pub fn to_toml(&self) -> Result<String, ParamError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Reads a parameter by dotted path, e.g. `eval.bishop_pair.mg`.
    pub fn get(&self, name: &str) -> Result<Value, ParamError> {
        let tree = serde_json::to_value(self)?;
        lookup(&tree, name)
            .cloned()
            .ok_or_else(|| ParamError::UnknownParameter(name.to_string()))
    }

    /// Replaces a parameter by dotted path. The value must have the same
    /// shape as the current one; on any error the parameters are unchanged.
    pub fn set(&mut self, name: &str, value: Value) -> Result<(), ParamError> {
        let mut tree = serde_json::to_value(&*self)?;
        let slot = lookup_mut(&mut tree, name)
            .ok_or_else(|| ParamError::UnknownParameter(name.to_string()))?;
        if !same_shape(slot, &value) {
            return Err(ParamError::TypeMismatch {
                name: name.to_string(),
                expected: describe(slot),
            });
        }
        *slot = value;
        let updated: Parameters = serde_json::from_value(tree)?;
        updated.validate()?;
        *self = updated;
        Ok(())
    }

    /// Dotted names of every leaf parameter of the given kind.
    pub fn names(&self, kind: ParamKind) -> Vec<String> {
        let mut names = Vec::new();
        if let Ok(tree) = serde_json::to_value(self) {
            if let Some(section) = tree.get(kind.section()) {
                collect_leaves(section, kind.section().to_string(), &mut names);
            }
        }
        names
    }

    /// Checks shape constraints serde cannot express.
    pub fn validate(&self) -> Result<(), ParamError> {
        let tables = [("pst_mg", &self.eval.pst_mg), ("pst_eg", &self.eval.pst_eg)];
        let names = ["pawn", "knight", "bishop", "rook", "queen", "king"];
        for (table_name, tables) in tables {
            for (piece, table) in names.iter().zip(tables.as_array()) {
                if table.len() != 64 {
                    return Err(invalid(
                        format!("eval.{table_name}.{piece}"),
                        format!("needs 64 entries, got {}", table.len()),
                    ));
                }
            }
        }
        for (name, ranks) in [
            ("eval.passed_pawn_mg", &self.eval.passed_pawn_mg),
            ("eval.passed_pawn_eg", &self.eval.passed_pawn_eg),
        ] {
            if ranks.len() != 8 {
                return Err(invalid(name, format!("needs 8 entries, got {}", ranks.len())));
            }
        }
        let management = &self.management;
        if management.hash_mb == 0 {
            return Err(invalid("management.hash_mb", "must be at least 1"));
        }
        if management.eval_cache_mb == 0 {
            return Err(invalid("management.eval_cache_mb", "must be at least 1"));
        }
        if management.generation_wrap < 2 {
            return Err(invalid("management.generation_wrap", "must be at least 2"));
        }
        if management.max_entry_age >= management.generation_wrap {
            return Err(invalid(
                "management.max_entry_age",
                "must be below management.generation_wrap",
            ));
        }
        if management.moves_to_go_opening == 0 || management.moves_to_go_endgame == 0 {
            return Err(invalid("management.moves_to_go_opening", "must be positive"));
        }
        if self.search.aspiration_delta <= 0 {
            return Err(invalid("search.aspiration_delta", "must be positive"));
        }
        Ok(())
    }
}

fn invalid(name: impl Into<String>, reason: impl Into<String>) -> ParamError {
    ParamError::InvalidValue {
        name: name.into(),
        reason: reason.into(),
    }
}

fn lookup<'a>(tree: &'a Value, name: &str) -> Option<&'a Value> {
    name.split('.')
        .try_fold(tree, |node, part| node.as_object()?.get(part))
}

fn lookup_mut<'a>(tree: &'a mut Value, name: &str) -> Option<&'a mut Value> {
    name.split('.')
        .try_fold(tree, |node, part| node.as_object_mut()?.get_mut(part))
}

fn same_shape(current: &Value, new: &Value) -> bool {
    match (current, new) {
        (Value::Bool(_), Value::Bool(_)) | (Value::String(_), Value::String(_)) => true,
        (Value::Number(a), Value::Number(b)) => a.is_f64() == b.is_f64(),
        (Value::Array(a), Value::Array(b)) => {
            a.len() == b.len() && a.iter().zip(b).all(|(x, y)| same_shape(x, y))
        }
        (Value::Object(a), Value::Object(b)) => {
            a.len() == b.len()
                && a.iter()
                    .all(|(key, x)| b.get(key).is_some_and(|y| same_shape(x, y)))
        }
        _ => false,
    }
}

fn describe(value: &Value) -> String {
    match value {
        Value::Bool(_) => "a boolean".to_string(),
        Value::Number(n) if n.is_f64() => "a number".to_string(),
        Value::Number(_) => "an integer".to_string(),
        Value::String(_) => "a string".to_string(),
        Value::Array(items) => format!("an array of {} integers", items.len()),
        Value::Object(_) => "a table with the same keys".to_string(),
        Value::Null => "a value".to_string(),
    }
}

fn collect_leaves(node: &Value, prefix: String, out: &mut Vec<String>) {
    match node {
        Value::Object(map) => {
            for (key, child) in map {
                collect_leaves(child, format!("{prefix}.{key}"), out);
            }
        }
        _ => out.push(prefix),
    }
}

#[rustfmt::skip]
const PAWN_MG: [i32; 64] = [
      0,   0,   0,   0,   0,   0,   0,   0,
     50,  50,  50,  50,  50,  50,  50,  50,
     10,  10,  20,  30,  30,  20,  10,  10,
      5,   5,  10,  25,  25,  10,   5,   5,
      0,   0,   0,  20,  20,   0,   0,   0,
      5,  -5, -10,   0,   0, -10,  -5,   5,
      5,  10,  10, -20, -20,  10,  10,   5,
      0,   0,   0,   0,   0,   0,   0,   0,
];

#[rustfmt::skip]
const PAWN_EG: [i32; 64] = [
      0,   0,   0,   0,   0,   0,   0,   0,
     80,  80,  80,  80,  80,  80,  80,  80,
     50,  50,  50,  50,  50,  50,  50,  50,
     30,  30,  30,  30,  30,  30,  30,  30,
     15,  15,  15,  15,  15,  15,  15,  15,
      5,   5,   5,   5,   5,   5,   5,   5,
      0,   0,   0,   0,   0,   0,   0,   0,
      0,   0,   0,   0,   0,   0,   0,   0,
];

#[rustfmt::skip]
const KNIGHT: [i32; 64] = [
    -50, -40, -30, -30, -30, -30, -40, -50,
    -40, -20,   0,   0,   0,   0, -20, -40,
    -30,   0,  10,  15,  15,  10,   0, -30,
    -30,   5,  15,  20,  20,  15,   5, -30,
    -30,   0,  15,  20,  20,  15,   0, -30,
    -30,   5,  10,  15,  15,  10,   5, -30,
    -40, -20,   0,   5,   5,   0, -20, -40,
    -50, -40, -30, -30, -30, -30, -40, -50,
];

#[rustfmt::skip]
const BISHOP: [i32; 64] = [
    -20, -10, -10, -10, -10, -10, -10, -20,
    -10,   0,   0,   0,   0,   0,   0, -10,
    -10,   0,   5,  10,  10,   5,   0, -10,
    -10,   5,   5,  10,  10,   5,   5, -10,
    -10,   0,  10,  10,  10,  10,   0, -10,
    -10,  10,  10,  10,  10,  10,  10, -10,
    -10,   5,   0,   0,   0,   0,   5, -10,
    -20, -10, -10, -10, -10, -10, -10, -20,
];

#[rustfmt::skip]
const ROOK_MG: [i32; 64] = [
      0,   0,   0,   0,   0,   0,   0,   0,
      5,  10,  10,  10,  10,  10,  10,   5,
     -5,   0,   0,   0,   0,   0,   0,  -5,
     -5,   0,   0,   0,   0,   0,   0,  -5,
     -5,   0,   0,   0,   0,   0,   0,  -5,
     -5,   0,   0,   0,   0,   0,   0,  -5,
     -5,   0,   0,   0,   0,   0,   0,  -5,
      0,   0,   0,   5,   5,   0,   0,   0,
];

#[rustfmt::skip]
const ROOK_EG: [i32; 64] = [
      5,   5,   5,   5,   5,   5,   5,   5,
     10,  10,  10,  10,  10,  10,  10,  10,
      0,   0,   0,   0,   0,   0,   0,   0,
      0,   0,   0,   0,   0,   0,   0,   0,
      0,   0,   0,   0,   0,   0,   0,   0,
      0,   0,   0,   0,   0,   0,   0,   0,
      0,   0,   0,   0,   0,   0,   0,   0,
      0,   0,   0,   0,   0,   0,   0,   0,
];

#[rustfmt::skip]
const QUEEN: [i32; 64] = [
    -20, -10, -10,  -5,  -5, -10, -10, -20,
    -10,   0,   0,   0,   0,   0,   0, -10,
    -10,   0,   5,   5,   5,   5,   0, -10,
     -5,   0,   5,   5,   5,   5,   0,  -5,
      0,   0,   5,   5,   5,   5,   0,  -5,
    -10,   5,   5,   5,   5,   5,   0, -10,
    -10,   0,   5,   0,   0,   0,   0, -10,
    -20, -10, -10,  -5,  -5, -10, -10, -20,
];

#[rustfmt::skip]
const KING_MG: [i32; 64] = [
    -30, -40, -40, -50, -50, -40, -40, -30,
    -30, -40, -40, -50, -50, -40, -40, -30,
    -30, -40, -40, -50, -50, -40, -40, -30,
    -30, -40, -40, -50, -50, -40, -40, -30,
    -20, -30, -30, -40, -40, -30, -30, -20,
    -10, -20, -20, -20, -20, -20, -20, -10,
     20,  20,   0,   0,   0,   0,  20,  20,
     20,  30,  10,   0,   0,  10,  30,  20,
];

#[rustfmt::skip]
const KING_EG: [i32; 64] = [
    -50, -40, -30, -20, -20, -30, -40, -50,
    -30, -20, -10,   0,   0, -10, -20, -30,
    -30, -10,  20,  30,  30,  20, -10, -30,
    -30, -10,  30,  40,  40,  30, -10, -30,
    -30, -10,  30,  40,  40,  30, -10, -30,
    -30, -10,  20,  30,  30,  20, -10, -30,
    -30, -30,   0,   0,   0,   0, -30, -30,
    -50, -30, -30, -30, -30, -30, -30, -50,
];

impl Default for EvalParams {
    fn default() -> Self {
        EvalParams {
            material_mg: PieceValues {
                pawn: 100,
                knight: 320,
                bishop: 330,
                rook: 500,
                queen: 900,
            },
            material_eg: PieceValues {
                pawn: 120,
                knight: 300,
                bishop: 320,
                rook: 530,
                queen: 950,
            },
            pst_mg: PieceTables {
                pawn: PAWN_MG.to_vec(),
                knight: KNIGHT.to_vec(),
                bishop: BISHOP.to_vec(),
                rook: ROOK_MG.to_vec(),
                queen: QUEEN.to_vec(),
                king: KING_MG.to_vec(),
            },
            pst_eg: PieceTables {
                pawn: PAWN_EG.to_vec(),
                knight: KNIGHT.to_vec(),
                bishop: BISHOP.to_vec(),
                rook: ROOK_EG.to_vec(),
                queen: QUEEN.to_vec(),
                king: KING_EG.to_vec(),
            },
            passed_pawn_mg: vec![0, 5, 10, 15, 25, 40, 60, 0],
            passed_pawn_eg: vec![0, 10, 15, 25, 45, 75, 110, 0],
            isolated_pawn: Taper::new(-12, -18),
            backward_pawn: Taper::new(-8, -10),
            doubled_pawn: Taper::new(-10, -20),
            blocked_pawn: Taper::new(-5, -10),
            mobility: PieceWeights {
                knight: Taper::new(4, 4),
                bishop: Taper::new(5, 5),
                rook: Taper::new(2, 4),
                queen: Taper::new(1, 2),
            },
            king_tropism: PieceWeights {
                knight: Taper::new(-3, 0),
                bishop: Taper::new(-2, 0),
                rook: Taper::new(-2, 0),
                queen: Taper::new(-4, 0),
            },
            pawn_shield: Taper::new(12, 0),
            bishop_pair: Taper::new(30, 50),
            tempo: 10,
        }
    }
}

impl Default for SearchParams {
    fn default() -> Self {
        SearchParams {
            aspiration_min_depth: 4,
            aspiration_delta: 25,
            aspiration_max_delta: 800,
            iid_min_depth: 5,
            iid_reduction: 2,
            null_move_min_depth: 2,
            null_move_reduction: 3,
            null_move_deep_depth: 7,
            null_verification_depth: 6,
            razor_margin: 300,
            futility_margin_d1: 125,
            futility_margin_d2: 300,
            lmr_min_depth: 3,
            lmr_full_moves: 4,
            lmr_reduction: 1,
            lmr_deep_moves: 12,
            check_extension: 8,
            recapture_extension: 4,
            single_reply_extension: 8,
            mate_threat_extension: 4,
            qsearch_check_plies: 1,
            delta_margin: 200,
            pv_max_length: 64,
        }
    }
}

impl Default for ManagementParams {
    fn default() -> Self {
        ManagementParams {
            hash_mb: 16,
            eval_cache_mb: 4,
            generation_wrap: 64,
            max_entry_age: 8,
            replacement_margin: 0,
            history_limit: 1 << 16,
            move_overhead_ms: 30,
            moves_to_go_opening: 40,
            moves_to_go_endgame: 20,
            increment_percent: 75,
            max_budget_percent: 40,
            iteration_start_percent: 55,
            extension_percent: 100,
            score_swing_margin: 40,
            churn_percent: 50,
            stale_iterations: 6,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        Parameters::default().validate().unwrap();
    }

    #[test]
    fn test_toml_round_trip() {
        let params = Parameters::default();
        let text = params.to_toml().unwrap();
        assert!(text.contains("[search]"));
        assert_eq!(Parameters::from_toml(&text).unwrap(), params);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let params = Parameters::from_toml(
            r#"
[search]
null_move_reduction = 2

[management]
hash_mb = 64
"#,
        )
        .unwrap();
        assert_eq!(params.search.null_move_reduction, 2);
        assert_eq!(params.management.hash_mb, 64);
        assert_eq!(params.search.aspiration_delta, 25);
        assert_eq!(params.eval, EvalParams::default());
    }

    #[test]
    fn test_invalid_toml_is_parse_error() {
        let err = Parameters::from_toml("[search\nnull_move_reduction = 2").unwrap_err();
        assert!(matches!(err, ParamError::Parse(_)));
    }

    #[test]
    fn test_short_table_rejected() {
        let err = Parameters::from_toml("[eval.pst_mg]\nknight = [1, 2, 3]").unwrap_err();
        assert!(matches!(err, ParamError::Parse(_) | ParamError::InvalidValue { .. }));
    }

    #[test]
    fn test_missing_file_is_read_error() {
        let err = Parameters::load("/nonexistent/params.toml").unwrap_err();
        assert!(matches!(err, ParamError::Read(_)));
    }

    #[test]
    fn test_get_nested_values() {
        let params = Parameters::default();
        assert_eq!(params.get("eval.bishop_pair.mg").unwrap(), 30);
        assert_eq!(params.get("management.hash_mb").unwrap(), 16);
        let table = params.get("eval.pst_mg.knight").unwrap();
        assert_eq!(table.as_array().map(Vec::len), Some(64));
    }

    #[test]
    fn test_unknown_name() {
        let mut params = Parameters::default();
        assert!(matches!(
            params.get("search.does_not_exist"),
            Err(ParamError::UnknownParameter(_))
        ));
        assert!(matches!(
            params.set("nope", 1.into()),
            Err(ParamError::UnknownParameter(_))
        ));
    }

    #[test]
    fn test_set_is_type_checked() {
        let mut params = Parameters::default();
        let err = params
            .set("search.razor_margin", Value::String("big".into()))
            .unwrap_err();
        assert!(matches!(err, ParamError::TypeMismatch { .. }));

        let err = params
            .set("eval.pst_mg.knight", serde_json::json!([1, 2, 3]))
            .unwrap_err();
        assert!(matches!(err, ParamError::TypeMismatch { .. }));
        assert_eq!(params, Parameters::default());
    }

    #[test]
    fn test_set_negative_into_unsigned_fails() {
        let mut params = Parameters::default();
        let err = params.set("management.hash_mb", (-1).into()).unwrap_err();
        assert!(matches!(err, ParamError::Invalid(_)));
        assert_eq!(params.management.hash_mb, 16);
    }

    #[test]
    fn test_set_validates() {
        let mut params = Parameters::default();
        let err = params.set("management.generation_wrap", 1.into()).unwrap_err();
        assert!(matches!(err, ParamError::InvalidValue { .. }));
        assert_eq!(params.management.generation_wrap, 64);
    }

    #[test]
    fn test_set_whole_table() {
        let mut params = Parameters::default();
        params
            .set("eval.pst_eg.queen", serde_json::json!(vec![7; 64]))
            .unwrap();
        assert!(params.eval.pst_eg.queen.iter().all(|&v| v == 7));
    }

    #[test]
    fn test_names_by_kind() {
        let params = Parameters::default();
        let search = params.names(ParamKind::Search);
        assert!(search.contains(&"search.null_move_reduction".to_string()));
        assert!(search.iter().all(|name| name.starts_with("search.")));

        let eval = params.names(ParamKind::Eval);
        assert!(eval.contains(&"eval.pst_mg.knight".to_string()));
        assert!(eval.contains(&"eval.mobility.rook.eg".to_string()));

        for name in params.names(ParamKind::Management) {
            assert!(params.get(&name).is_ok(), "{name}");
        }
    }

    #[test]
    fn test_kind_from_str() {
        assert_eq!("eval".parse::<ParamKind>().unwrap(), ParamKind::Eval);
        assert!("tuning".parse::<ParamKind>().is_err());
    }
}
