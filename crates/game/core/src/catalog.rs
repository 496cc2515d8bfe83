//! Catalog data shapes and normalization.
//!
//! These are the JSON shapes served by the catalog backend (camelCase field
//! names). The core consumes them and normalizes everything into canonical
//! engine types before combat starts: cost forms collapse into a single
//! [`Cost`] map, skill kinds/targets/elements parse with safe defaults, and
//! resource definitions merge with skill references and legacy flat gauges
//! into [`PoolSpec`]s.
//!
//! Normalization never fails: a missing or malformed field degrades to a
//! zero/no-op default instead of refusing the whole definition.

use std::collections::BTreeMap;

use crate::ai::AiProfile;
use crate::combatant::Combatant;
use crate::effect::Effect;
use crate::resource::{Cost, PoolSpec, ResourceKind, StartSpec};
use crate::skill::{Element, Skill, SkillKind, TargetSelector};
use crate::stats::BaseStats;

// ============================================================================
// Raw shapes
// ============================================================================

/// A whole class catalog file: the class proper plus the starter kit shown
/// on the selection screen.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ClassDocument {
    pub class: ClassDefinition,
    pub starter: Option<StarterKit>,
}

/// A playable class definition.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "camelCase"))]
pub struct ClassDefinition {
    pub id: String,
    pub name: String,
    /// Free-form archetype tags ("melee", "tank", ...).
    pub archetype: Vec<String>,
    /// Short stat keys → values. Legacy flat gauges (`hp`, `mp`) live here
    /// too and feed pool initialization rather than the stat block.
    pub base_stats: BTreeMap<String, i32>,
    /// Declared resource pools by key.
    pub resources: BTreeMap<String, ResourceDef>,
    pub skills: Vec<SkillDef>,
}

/// One declared resource pool.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "camelCase"))]
pub struct ResourceDef {
    pub max: Option<u32>,
    /// Stat key whose value defines the ceiling (kept in sync as the stat
    /// changes).
    pub max_from_stat: Option<String>,
    pub start: Option<StartValue>,
    pub regen_per_turn: Option<u32>,
    pub label: Option<String>,
}

/// Starting value: a literal, or the keyword `"full"`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum StartValue {
    Amount(u32),
    Keyword(String),
}

/// One skill as declared in a catalog.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "camelCase"))]
pub struct SkillDef {
    pub id: String,
    pub name: Option<String>,
    /// "physical" / "magic" / "support" (plus aliases); defaults physical.
    #[cfg_attr(feature = "serde", serde(rename = "type"))]
    pub kind: Option<String>,
    /// "enemy" or "self"; defaults enemy.
    pub target: Option<String>,
    pub cost: CostDef,
    pub accuracy: i32,
    pub element: Option<String>,
    pub cooldown: u32,
    pub effects: Vec<Effect>,
    pub tags: Vec<String>,
}

/// The cost forms catalogs use.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum CostDef {
    /// No cost declared.
    #[default]
    Free,
    /// Bare number: conventionally mana.
    Flat(u32),
    /// Explicit single resource.
    Single { amount: u32, resource: String },
    /// Multi-resource map.
    Map(BTreeMap<String, u32>),
}

/// Starter kit preview data (selection screen only; no combat meaning).
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct StarterKit {
    pub inventory: Vec<StarterItem>,
}

#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct StarterItem {
    pub id: Option<String>,
    pub name: Option<String>,
    pub qty: Option<u32>,
}

/// Decision hints from an enemy catalog.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct AiHints {
    pub openers: Vec<String>,
    pub priority: Vec<String>,
}

/// An enemy definition.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "camelCase"))]
pub struct EnemyDefinition {
    pub id: String,
    pub name: String,
    pub family: String,
    pub class_archetype: String,
    pub level_range: Option<[u32; 2]>,
    pub base_stats: BTreeMap<String, i32>,
    /// Percent resistance per element name; unknown elements are ignored.
    pub resistances: BTreeMap<String, i32>,
    pub ai_hints: AiHints,
    pub skills: SkillTable,
    pub tags: Vec<String>,
}

/// Enemy skills: a JSON map keyed by id (declaration order preserved) or a
/// plain list.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SkillTable(pub Vec<SkillDef>);

#[cfg(feature = "serde")]
impl serde::Serialize for SkillTable {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for SkillTable {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct TableVisitor;

        impl<'de> serde::de::Visitor<'de> for TableVisitor {
            type Value = SkillTable;

            fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str("a skill list or a map keyed by skill id")
            }

            fn visit_seq<A: serde::de::SeqAccess<'de>>(
                self,
                mut seq: A,
            ) -> Result<Self::Value, A::Error> {
                let mut skills = Vec::new();
                while let Some(def) = seq.next_element::<SkillDef>()? {
                    skills.push(def);
                }
                Ok(SkillTable(skills))
            }

            // MapAccess yields entries in document order, which is what the
            // "any ready attack" policy step iterates in.
            fn visit_map<A: serde::de::MapAccess<'de>>(
                self,
                mut map: A,
            ) -> Result<Self::Value, A::Error> {
                let mut skills = Vec::new();
                while let Some((id, mut def)) = map.next_entry::<String, SkillDef>()? {
                    if def.id.is_empty() {
                        def.id = id;
                    }
                    skills.push(def);
                }
                Ok(SkillTable(skills))
            }
        }

        deserializer.deserialize_any(TableVisitor)
    }
}

// ============================================================================
// Normalization
// ============================================================================

/// "goblin_thug" → "Goblin Thug"; fallback display names for catalog
/// entries that omit one.
pub fn titleize(raw: &str) -> String {
    raw.split(['_', '-', ' '])
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

impl CostDef {
    pub fn normalize(&self) -> Cost {
        match self {
            Self::Free => Cost::free(),
            Self::Flat(amount) => Cost::single("mana", *amount),
            Self::Single { amount, resource } => Cost::single(resource.clone(), *amount),
            Self::Map(map) => {
                Cost::from_entries(map.iter().map(|(key, amount)| (key.clone(), *amount)))
            }
        }
    }
}

impl SkillDef {
    /// Lower a raw definition into an immutable [`Skill`]. Unparseable
    /// fields fall back to defaults; they never reject the skill.
    pub fn normalize(&self) -> Skill {
        let kind = self
            .kind
            .as_deref()
            .and_then(|raw| raw.parse::<SkillKind>().ok())
            .unwrap_or(SkillKind::Physical);
        let target = self
            .target
            .as_deref()
            .and_then(|raw| raw.parse::<TargetSelector>().ok())
            .unwrap_or(TargetSelector::Enemy);
        let element = self
            .element
            .as_deref()
            .and_then(|raw| raw.parse::<Element>().ok());

        Skill {
            id: self.id.clone(),
            name: self
                .name
                .clone()
                .unwrap_or_else(|| titleize(&self.id)),
            kind,
            target,
            cost: self.cost.normalize(),
            accuracy_bonus: self.accuracy,
            element,
            cooldown: self.cooldown,
            effects: self.effects.clone(),
        }
    }
}

/// Merge declared resources, skill cost/restore references, and legacy flat
/// gauges into pool specs.
///
/// The HP pool always exists and comes first. A nonzero legacy `mp` gauge
/// produces a mana pool even when nothing else references one.
fn pool_specs(
    resources: &BTreeMap<String, ResourceDef>,
    skills: &[Skill],
    base_stats: &BTreeMap<String, i32>,
) -> Vec<PoolSpec> {
    let legacy_gauge = |key: &str| -> Option<u32> {
        let stat_key = match ResourceKind::classify(key) {
            ResourceKind::Health => "hp",
            ResourceKind::Mana => "mp",
            _ => return None,
        };
        base_stats
            .get(stat_key)
            .copied()
            .filter(|value| *value > 0)
            .map(|value| value as u32)
    };

    let spec_for = |key: &str, def: Option<&ResourceDef>| -> PoolSpec {
        let legacy = legacy_gauge(key);
        let tied_stat = def
            .and_then(|d| d.max_from_stat.as_deref())
            .and_then(|raw| raw.parse().ok());
        // The legacy gauge supplies the ceiling only when the definition
        // declares neither a max nor a tied stat.
        let explicit_max = match def.and_then(|d| d.max) {
            Some(max) => Some(max),
            None if tied_stat.is_none() => legacy,
            None => None,
        };
        let start = match def.and_then(|d| d.start.clone()) {
            Some(StartValue::Amount(value)) => StartSpec::Literal(value),
            Some(StartValue::Keyword(word)) if word.eq_ignore_ascii_case("full") => {
                StartSpec::Full
            }
            _ => legacy.map(StartSpec::LegacyMirror).unwrap_or(StartSpec::Unset),
        };
        PoolSpec {
            key: key.to_string(),
            label: def.and_then(|d| d.label.clone()),
            explicit_max,
            tied_stat,
            start,
            regen_per_turn: def.and_then(|d| d.regen_per_turn).unwrap_or(0),
        }
    };

    let mut specs = vec![spec_for("hp", resources.get("hp"))];
    let have = |specs: &[PoolSpec], key: &str| specs.iter().any(|spec| spec.key == key);

    for (key, def) in resources {
        if key != "hp" {
            specs.push(spec_for(key, Some(def)));
        }
    }

    // Pools referenced by skill costs and restore effects.
    for skill in skills {
        for (key, _) in skill.cost.entries() {
            if !have(&specs, key) {
                specs.push(spec_for(key, None));
            }
        }
        for effect in &skill.effects {
            if let Effect::Restore { resource, .. } = effect
                && !have(&specs, resource)
            {
                specs.push(spec_for(resource, None));
            }
        }
    }

    // A nonzero mana-equivalent gauge creates a mana pool on its own.
    if legacy_gauge("mana").is_some() && !have(&specs, "mana") && !have(&specs, "mp") {
        specs.push(spec_for("mana", None));
    }

    specs
}

impl ClassDefinition {
    pub fn stats(&self) -> BaseStats {
        BaseStats::from_catalog(
            self.base_stats
                .iter()
                .map(|(key, value)| (key.as_str(), *value)),
        )
    }

    pub fn normalized_skills(&self) -> Vec<Skill> {
        self.skills.iter().map(SkillDef::normalize).collect()
    }

    /// Build the player combatant: catalog data merged with runtime
    /// overrides (display name, level).
    pub fn combatant(&self, name: Option<&str>, level: u32) -> Combatant {
        let stats = self.stats();
        let skills = self.normalized_skills();
        let specs = pool_specs(&self.resources, &skills, &self.base_stats);
        let display = name
            .map(str::to_string)
            .unwrap_or_else(|| self.display_name());
        Combatant::new(display, self.id.clone(), level.max(1), stats, specs)
            .with_skills(skills)
    }

    pub fn display_name(&self) -> String {
        if self.name.is_empty() {
            titleize(&self.id)
        } else {
            self.name.clone()
        }
    }
}

impl EnemyDefinition {
    pub fn level_range(&self) -> (u32, u32) {
        let [low, high] = self.level_range.unwrap_or([1, 1]);
        (low.max(1), high.max(low.max(1)))
    }

    pub fn display_name(&self) -> String {
        if self.name.is_empty() {
            titleize(&self.id)
        } else {
            self.name.clone()
        }
    }

    /// Build the enemy combatant at the given level, clamped into the
    /// declared range (range minimum when unspecified).
    pub fn combatant(&self, level: Option<u32>) -> Combatant {
        let (low, high) = self.level_range();
        let level = level.unwrap_or(low).clamp(low, high);

        let stats = BaseStats::from_catalog(
            self.base_stats
                .iter()
                .map(|(key, value)| (key.as_str(), *value)),
        );
        let skills: Vec<Skill> = self.skills.0.iter().map(SkillDef::normalize).collect();
        let specs = pool_specs(&BTreeMap::new(), &skills, &self.base_stats);
        let resistances = self
            .resistances
            .iter()
            .filter_map(|(key, percent)| {
                key.parse::<Element>().ok().map(|element| (element, *percent))
            })
            .collect();

        Combatant::new(self.display_name(), self.id.clone(), level, stats, specs)
            .with_skills(skills)
            .with_resistances(resistances)
            .with_ai(AiProfile {
                openers: self.ai_hints.openers.clone(),
                priority: self.ai_hints.priority.clone(),
            })
    }
}
