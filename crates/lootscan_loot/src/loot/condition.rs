use crate::LootError;
use crate::item::ScoreRange;
use crate::value::NumberProvider;
use indexmap::IndexMap;
use serde::Deserialize;
use std::path::PathBuf;
use std::rc::Rc;

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "condition")]
pub enum LootConditionProto {
    #[serde(rename = "minecraft:entity_scores", alias = "entity_scores")]
    EntityScores {
        #[serde(default)]
        scores: IndexMap<String, ScoreBoundsProto>,
    },
    #[serde(rename = "minecraft:reference", alias = "reference")]
    Reference { name: String },
    #[serde(rename = "minecraft:all_of", alias = "all_of")]
    AllOf { terms: Vec<LootConditionProto> },
    #[serde(other)]
    Unknown,
}

/// Bounds of one scoreboard objective: an exact score or a `{min, max}` range.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ScoreBoundsProto {
    Exact(f64),
    Range {
        #[serde(default)]
        min: Option<NumberProvider>,
        #[serde(default)]
        max: Option<NumberProvider>,
    },
}

impl ScoreBoundsProto {
    pub fn to_range(&self) -> ScoreRange {
        match self {
            ScoreBoundsProto::Exact(score) => {
                let score = *score as i32;
                ScoreRange::new(Some(score), Some(score))
            }
            ScoreBoundsProto::Range { min, max } => ScoreRange::new(
                min.as_ref().and_then(NumberProvider::lower).map(|v| v as i32),
                max.as_ref().and_then(NumberProvider::upper).map(|v| v as i32),
            ),
        }
    }
}

/// Finds the first scoreboard range among `conditions`, descending into
/// `all_of` terms and referenced predicates. `lookup` loads the conditions of a
/// referenced predicate by name.
pub fn progression_range<F>(
    conditions: &[LootConditionProto],
    lookup: &mut F,
) -> Result<Option<ScoreRange>, LootError>
where
    F: FnMut(&str) -> Result<Rc<Vec<LootConditionProto>>, LootError>,
{
    let mut visiting = Vec::new();
    find_range(conditions, lookup, &mut visiting)
}

fn find_range<F>(
    conditions: &[LootConditionProto],
    lookup: &mut F,
    visiting: &mut Vec<String>,
) -> Result<Option<ScoreRange>, LootError>
where
    F: FnMut(&str) -> Result<Rc<Vec<LootConditionProto>>, LootError>,
{
    for condition in conditions {
        let found = match condition {
            LootConditionProto::EntityScores { scores } => {
                scores.values().next().map(ScoreBoundsProto::to_range)
            }
            LootConditionProto::AllOf { terms } => find_range(terms, lookup, visiting)?,
            LootConditionProto::Reference { name } => {
                if visiting.iter().any(|v| v == name) {
                    return Err(LootError::CyclicReference {
                        path: PathBuf::from(name),
                        chain: visiting.iter().map(PathBuf::from).collect(),
                    });
                }
                let predicate = lookup(name)?;
                visiting.push(name.clone());
                let found = find_range(&predicate, lookup, visiting);
                visiting.pop();
                found?
            }
            LootConditionProto::Unknown => None,
        };
        if found.is_some() {
            return Ok(found);
        }
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rustc_hash::FxHashMap;

    fn conditions(json: &str) -> Vec<LootConditionProto> {
        serde_json::from_str(json).unwrap()
    }

    fn no_predicates(name: &str) -> Result<Rc<Vec<LootConditionProto>>, LootError> {
        Err(LootError::MissingFile {
            path: PathBuf::from(name),
            reference: name.to_owned(),
        })
    }

    #[test]
    fn entity_scores_range() {
        let conditions = conditions(
            r#"[
                {"condition": "minecraft:random_chance", "chance": 0.5},
                {"condition": "minecraft:entity_scores", "entity": "this", "scores": {"mt.stone": {"min": 10, "max": 50}}}
            ]"#,
        );
        let range = progression_range(&conditions, &mut no_predicates).unwrap();
        assert_eq!(range, Some(ScoreRange::new(Some(10), Some(50))));
    }

    #[test]
    fn exact_score_and_constant_bounds() {
        let exact = conditions(r#"[{"condition": "entity_scores", "scores": {"mt.stone": 5}}]"#);
        assert_eq!(
            progression_range(&exact, &mut no_predicates).unwrap(),
            Some(ScoreRange::new(Some(5), Some(5)))
        );

        let open = conditions(
            r#"[{"condition": "minecraft:all_of", "terms": [
                {"condition": "minecraft:entity_scores", "scores": {"mt.stone": {"min": {"type": "minecraft:constant", "value": 200}}}}
            ]}]"#,
        );
        assert_eq!(
            progression_range(&open, &mut no_predicates).unwrap(),
            Some(ScoreRange::new(Some(200), None))
        );
    }

    #[test]
    fn follows_predicate_references() {
        let mut predicates = FxHashMap::default();
        predicates.insert(
            "mt:stone/early".to_owned(),
            Rc::new(conditions(
                r#"[{"condition": "minecraft:entity_scores", "scores": {"mt.stone": {"max": 99}}}]"#,
            )),
        );
        let mut lookup = |name: &str| {
            predicates.get(name).cloned().ok_or_else(|| LootError::MissingFile {
                path: PathBuf::from(name),
                reference: name.to_owned(),
            })
        };
        let start = conditions(r#"[{"condition": "minecraft:reference", "name": "mt:stone/early"}]"#);
        assert_eq!(
            progression_range(&start, &mut lookup).unwrap(),
            Some(ScoreRange::new(None, Some(99)))
        );

        let missing = conditions(r#"[{"condition": "minecraft:reference", "name": "mt:nope"}]"#);
        assert!(matches!(
            progression_range(&missing, &mut lookup),
            Err(LootError::MissingFile { .. })
        ));
    }

    #[test]
    fn predicate_cycle_is_an_error() {
        let looping = Rc::new(conditions(r#"[{"condition": "minecraft:reference", "name": "mt:loop"}]"#));
        let mut lookup = |_: &str| Ok::<_, LootError>(looping.clone());
        let start = conditions(r#"[{"condition": "minecraft:reference", "name": "mt:loop"}]"#);
        assert!(matches!(
            progression_range(&start, &mut lookup),
            Err(LootError::CyclicReference { .. })
        ));
    }

    #[test]
    fn unrelated_conditions_yield_nothing() {
        let conditions = conditions(r#"[{"condition": "minecraft:killed_by_player"}]"#);
        assert_eq!(progression_range(&conditions, &mut no_predicates).unwrap(), None);
    }
}
