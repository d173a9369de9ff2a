//! Static scenario data: entity, faction and variable classes.
//!
//! A [`Scenario`] is the read-only lookup service instructions resolve class and
//! variable identifiers against. It is shared by every world built from it and
//! never changes while a game runs.
//!
//! Scenarios load from JSON:
//!
//! ```
//! use hexkit_world::{Scenario, VariableCategory};
//!
//! let scenario = Scenario::from_json_str(r#"{
//!     "width": 6,
//!     "height": 4,
//!     "variables": [
//!         { "id": "gold", "name": "Gold", "category": "Resource", "minimum": 0 }
//!     ],
//!     "faction_classes": [
//!         { "id": "red", "name": "Red Empire", "resources": { "gold": 10 } }
//!     ]
//! }"#).unwrap();
//!
//! assert_eq!(scenario.variable("gold").unwrap().category, VariableCategory::Resource);
//! assert!(scenario.faction_class("red").is_some());
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// Errors raised while loading scenario data.
#[derive(Debug, Error)]
pub enum ScenarioError {
    /// The JSON document could not be parsed.
    #[error("scenario parse error: {0}")]
    Json(#[from] serde_json::Error),
    /// The map dimensions are not positive.
    #[error("invalid map size {width}x{height}")]
    InvalidMapSize {
        /// Map width in columns
        width: i32,
        /// Map height in rows
        height: i32,
    },
    /// Two classes of the same kind share an identifier.
    #[error("duplicate {kind} identifier \"{id}\"")]
    DuplicateId {
        /// Kind of class ("variable", "entity class", "faction class")
        kind: &'static str,
        /// Offending identifier
        id: String,
    },
    /// A class references a variable that is not defined.
    #[error("{owner} references unknown variable \"{variable}\"")]
    UnknownVariable {
        /// Identifier of the referencing class
        owner: String,
        /// Missing variable identifier
        variable: String,
    },
    /// A class uses a variable in a slot of the wrong category.
    #[error("{owner} uses variable \"{variable}\" as {expected}")]
    WrongCategory {
        /// Identifier of the referencing class
        owner: String,
        /// Variable identifier
        variable: String,
        /// Category the slot requires
        expected: VariableCategory,
    },
}

// =============================================================================
// Variables
// =============================================================================

/// Category of a variable, selecting which container stores its values.
///
/// - `Attribute`: entity-only, e.g. strength or movement points
/// - `Counter`: faction-only, e.g. victory points
/// - `Resource`: held by both entities and factions, e.g. gold
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum VariableCategory {
    /// Entity attribute
    Attribute,
    /// Faction counter
    Counter,
    /// Entity or faction resource
    Resource,
}

impl fmt::Display for VariableCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Attribute => write!(f, "Attribute"),
            Self::Counter => write!(f, "Counter"),
            Self::Resource => write!(f, "Resource"),
        }
    }
}

fn default_minimum() -> i32 {
    i32::MIN
}

fn default_maximum() -> i32 {
    i32::MAX
}

/// Definition of a variable.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VariableClass {
    /// Unique identifier
    pub id: String,
    /// Display name
    #[serde(default)]
    pub name: String,
    /// Storage category
    pub category: VariableCategory,
    /// Smallest legal value
    #[serde(default = "default_minimum")]
    pub minimum: i32,
    /// Largest legal value
    #[serde(default = "default_maximum")]
    pub maximum: i32,
}

impl VariableClass {
    /// Creates an unbounded variable.
    #[must_use]
    pub fn new(id: &str, category: VariableCategory) -> Self {
        Self {
            id: id.to_string(),
            name: id.to_string(),
            category,
            minimum: i32::MIN,
            maximum: i32::MAX,
        }
    }

    /// Sets the legal value range.
    #[must_use]
    pub fn with_range(mut self, minimum: i32, maximum: i32) -> Self {
        self.minimum = minimum;
        self.maximum = maximum;
        self
    }

    /// Clamps `value` into the legal range.
    #[must_use]
    pub fn clamp(&self, value: i32) -> i32 {
        value.max(self.minimum).min(self.maximum)
    }
}

// =============================================================================
// Modifiers
// =============================================================================

/// Which entities or factions a modifier applies to.
///
/// Modifiers with any target other than [`ModifierTarget::Own`] propagate through
/// the [`ModifierMap`](crate::ModifierMap).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ModifierTarget {
    /// The entity carrying the modifier
    #[serde(rename = "Self")]
    Own,
    /// The faction owning the entity
    Owner,
    /// All units on the entity's site
    Units,
    /// Units of the entity's owner on the entity's site
    OwnerUnits,
    /// All units within the class modifier range
    UnitsRanged,
    /// Units of the entity's owner within the class modifier range
    OwnerUnitsRanged,
}

impl ModifierTarget {
    /// Every target, in declaration order.
    pub const ALL: [Self; 6] = [
        Self::Own,
        Self::Owner,
        Self::Units,
        Self::OwnerUnits,
        Self::UnitsRanged,
        Self::OwnerUnitsRanged,
    ];

    /// Returns the wire name of this target.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Own => "Self",
            Self::Owner => "Owner",
            Self::Units => "Units",
            Self::OwnerUnits => "OwnerUnits",
            Self::UnitsRanged => "UnitsRanged",
            Self::OwnerUnitsRanged => "OwnerUnitsRanged",
        }
    }

    /// Parses a wire name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.name() == name)
    }

    /// Returns `true` if only units of the modifier's owner are affected.
    #[must_use]
    pub const fn is_owner_restricted(self) -> bool {
        matches!(self, Self::OwnerUnits | Self::OwnerUnitsRanged)
    }

    /// Returns `true` if the modifier reaches beyond its own site.
    #[must_use]
    pub const fn is_ranged(self) -> bool {
        matches!(self, Self::UnitsRanged | Self::OwnerUnitsRanged)
    }
}

impl fmt::Display for ModifierTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A modifier value declared by an entity class.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ModifierDefinition {
    /// Variable being modified
    pub variable: String,
    /// Who receives the modifier
    pub target: ModifierTarget,
    /// Modifier value
    pub value: i32,
}

// =============================================================================
// Classes
// =============================================================================

/// Category of an entity, deciding where it lives on a site and what it can do.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EntityCategory {
    /// Movable, attacking piece
    Unit,
    /// Map terrain; owned by the site owner
    Terrain,
    /// Transient effect
    Effect,
    /// Faction-wide improvement
    Upgrade,
}

impl fmt::Display for EntityCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unit => write!(f, "Unit"),
            Self::Terrain => write!(f, "Terrain"),
            Self::Effect => write!(f, "Effect"),
            Self::Upgrade => write!(f, "Upgrade"),
        }
    }
}

/// Template for entities.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityClass {
    /// Unique identifier
    pub id: String,
    /// Display name, used as the default entity name
    #[serde(default)]
    pub name: String,
    /// Entity category
    pub category: EntityCategory,
    /// Initial attribute values
    #[serde(default)]
    pub attributes: BTreeMap<String, i32>,
    /// Initial resource values
    #[serde(default)]
    pub resources: BTreeMap<String, i32>,
    /// Modifiers every entity of this class carries
    #[serde(default)]
    pub modifiers: Vec<ModifierDefinition>,
    /// Reach of ranged modifiers, in hex steps
    #[serde(default)]
    pub modifier_range: i32,
}

impl EntityClass {
    /// Creates a class with no variables or modifiers.
    #[must_use]
    pub fn new(id: &str, category: EntityCategory) -> Self {
        Self {
            id: id.to_string(),
            name: id.to_string(),
            category,
            attributes: BTreeMap::new(),
            resources: BTreeMap::new(),
            modifiers: Vec::new(),
            modifier_range: 0,
        }
    }

    /// Adds an initial attribute value.
    #[must_use]
    pub fn with_attribute(mut self, variable: &str, value: i32) -> Self {
        self.attributes.insert(variable.to_string(), value);
        self
    }

    /// Adds an initial resource value.
    #[must_use]
    pub fn with_resource(mut self, variable: &str, value: i32) -> Self {
        self.resources.insert(variable.to_string(), value);
        self
    }

    /// Adds a modifier.
    #[must_use]
    pub fn with_modifier(mut self, variable: &str, target: ModifierTarget, value: i32) -> Self {
        self.modifiers.push(ModifierDefinition {
            variable: variable.to_string(),
            target,
            value,
        });
        self
    }

    /// Sets the ranged modifier reach.
    #[must_use]
    pub fn with_modifier_range(mut self, range: i32) -> Self {
        self.modifier_range = range;
        self
    }
}

/// Template for a faction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FactionClass {
    /// Unique identifier, reused as the faction identifier
    pub id: String,
    /// Display name
    #[serde(default)]
    pub name: String,
    /// Initial counter values
    #[serde(default)]
    pub counters: BTreeMap<String, i32>,
    /// Initial resource values
    #[serde(default)]
    pub resources: BTreeMap<String, i32>,
}

impl FactionClass {
    /// Creates a class with no variables.
    #[must_use]
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            name: id.to_string(),
            counters: BTreeMap::new(),
            resources: BTreeMap::new(),
        }
    }

    /// Adds an initial counter value.
    #[must_use]
    pub fn with_counter(mut self, variable: &str, value: i32) -> Self {
        self.counters.insert(variable.to_string(), value);
        self
    }

    /// Adds an initial resource value.
    #[must_use]
    pub fn with_resource(mut self, variable: &str, value: i32) -> Self {
        self.resources.insert(variable.to_string(), value);
        self
    }
}

// =============================================================================
// Scenario
// =============================================================================

/// On-disk layout of a scenario.
#[derive(Deserialize)]
struct ScenarioFile {
    width: i32,
    height: i32,
    #[serde(default)]
    variables: Vec<VariableClass>,
    #[serde(default)]
    entity_classes: Vec<EntityClass>,
    #[serde(default)]
    faction_classes: Vec<FactionClass>,
}

/// Read-only static game data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Scenario {
    width: i32,
    height: i32,
    variables: BTreeMap<String, VariableClass>,
    entity_classes: BTreeMap<String, EntityClass>,
    faction_classes: BTreeMap<String, FactionClass>,
}

impl Scenario {
    /// Creates an empty scenario with a `width` x `height` map.
    #[must_use]
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            width: width.max(0),
            height: height.max(0),
            variables: BTreeMap::new(),
            entity_classes: BTreeMap::new(),
            faction_classes: BTreeMap::new(),
        }
    }

    /// Parses and validates a JSON scenario.
    ///
    /// # Errors
    ///
    /// Returns [`ScenarioError`] if the document is malformed, an identifier is
    /// duplicated, or a class references a missing or miscategorised variable.
    pub fn from_json_str(json: &str) -> Result<Self, ScenarioError> {
        let file: ScenarioFile = serde_json::from_str(json)?;
        if file.width <= 0 || file.height <= 0 {
            return Err(ScenarioError::InvalidMapSize {
                width: file.width,
                height: file.height,
            });
        }

        let mut scenario = Self::new(file.width, file.height);
        for variable in file.variables {
            if scenario.variables.contains_key(&variable.id) {
                return Err(ScenarioError::DuplicateId {
                    kind: "variable",
                    id: variable.id,
                });
            }
            scenario.variables.insert(variable.id.clone(), variable);
        }
        for class in file.entity_classes {
            if scenario.entity_classes.contains_key(&class.id) {
                return Err(ScenarioError::DuplicateId {
                    kind: "entity class",
                    id: class.id,
                });
            }
            scenario.entity_classes.insert(class.id.clone(), class);
        }
        for class in file.faction_classes {
            if scenario.faction_classes.contains_key(&class.id) {
                return Err(ScenarioError::DuplicateId {
                    kind: "faction class",
                    id: class.id,
                });
            }
            scenario.faction_classes.insert(class.id.clone(), class);
        }

        scenario.validate()?;
        tracing::debug!(
            variables = scenario.variables.len(),
            entity_classes = scenario.entity_classes.len(),
            faction_classes = scenario.faction_classes.len(),
            "scenario loaded"
        );
        Ok(scenario)
    }

    /// Checks that every variable a class references exists with the right category.
    ///
    /// # Errors
    ///
    /// Returns the first dangling or miscategorised reference found.
    pub fn validate(&self) -> Result<(), ScenarioError> {
        for class in self.entity_classes.values() {
            for variable in class.attributes.keys() {
                self.check_variable(&class.id, variable, &[VariableCategory::Attribute])?;
            }
            for variable in class.resources.keys() {
                self.check_variable(&class.id, variable, &[VariableCategory::Resource])?;
            }
            for modifier in &class.modifiers {
                self.check_variable(
                    &class.id,
                    &modifier.variable,
                    &[VariableCategory::Attribute, VariableCategory::Resource],
                )?;
            }
        }
        for class in self.faction_classes.values() {
            for variable in class.counters.keys() {
                self.check_variable(&class.id, variable, &[VariableCategory::Counter])?;
            }
            for variable in class.resources.keys() {
                self.check_variable(&class.id, variable, &[VariableCategory::Resource])?;
            }
        }
        Ok(())
    }

    fn check_variable(
        &self,
        owner: &str,
        variable: &str,
        allowed: &[VariableCategory],
    ) -> Result<(), ScenarioError> {
        let Some(class) = self.variables.get(variable) else {
            return Err(ScenarioError::UnknownVariable {
                owner: owner.to_string(),
                variable: variable.to_string(),
            });
        };
        if allowed.contains(&class.category) {
            Ok(())
        } else {
            Err(ScenarioError::WrongCategory {
                owner: owner.to_string(),
                variable: variable.to_string(),
                expected: allowed[0],
            })
        }
    }

    /// Adds a variable definition.
    #[must_use]
    pub fn with_variable(mut self, variable: VariableClass) -> Self {
        self.variables.insert(variable.id.clone(), variable);
        self
    }

    /// Adds an entity class.
    #[must_use]
    pub fn with_entity_class(mut self, class: EntityClass) -> Self {
        self.entity_classes.insert(class.id.clone(), class);
        self
    }

    /// Adds a faction class.
    #[must_use]
    pub fn with_faction_class(mut self, class: FactionClass) -> Self {
        self.faction_classes.insert(class.id.clone(), class);
        self
    }

    /// Returns the map width in columns.
    #[must_use]
    pub const fn width(&self) -> i32 {
        self.width
    }

    /// Returns the map height in rows.
    #[must_use]
    pub const fn height(&self) -> i32 {
        self.height
    }

    /// Looks up a variable definition.
    #[must_use]
    pub fn variable(&self, id: &str) -> Option<&VariableClass> {
        self.variables.get(id)
    }

    /// Looks up an entity class.
    #[must_use]
    pub fn entity_class(&self, id: &str) -> Option<&EntityClass> {
        self.entity_classes.get(id)
    }

    /// Looks up a faction class.
    #[must_use]
    pub fn faction_class(&self, id: &str) -> Option<&FactionClass> {
        self.faction_classes.get(id)
    }

    /// Iterates over entity classes in identifier order.
    pub fn entity_classes(&self) -> impl Iterator<Item = &EntityClass> + '_ {
        self.entity_classes.values()
    }

    /// Iterates over faction classes in identifier order.
    pub fn faction_classes(&self) -> impl Iterator<Item = &FactionClass> + '_ {
        self.faction_classes.values()
    }
}
