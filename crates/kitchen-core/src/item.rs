//! The item model: ingredients, plates and the dishes assembled on them.
//!
//! Items are plain owned values. Whoever holds one (a chef's hand or a
//! station slot) owns it; handing it over is a move.

use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Ingredient
// ---------------------------------------------------------------------------

/// How far an ingredient has been prepared. Ordered: states only move
/// forwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum IngredientState {
    Raw,
    Chopped,
    Cooked,
}

impl fmt::Display for IngredientState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            IngredientState::Raw => "raw",
            IngredientState::Chopped => "chopped",
            IngredientState::Cooked => "cooked",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ingredient {
    name: String,
    state: IngredientState,
    choppable: bool,
}

impl Ingredient {
    /// A fresh, raw ingredient.
    pub fn new(name: impl Into<String>, choppable: bool) -> Self {
        Self {
            name: name.into(),
            state: IngredientState::Raw,
            choppable,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn state(&self) -> IngredientState {
        self.state
    }

    pub fn is_choppable(&self) -> bool {
        self.choppable
    }

    /// Raw and choppable: the only thing a cutting board accepts for a cut.
    pub fn can_be_chopped(&self) -> bool {
        self.choppable && self.state == IngredientState::Raw
    }

    /// Anything past raw may go onto a dish.
    pub fn is_prepared(&self) -> bool {
        self.state > IngredientState::Raw
    }

    /// Whether a stove accepts this ingredient. Choppable ingredients must
    /// be chopped first; the rest cook straight from raw.
    pub fn can_be_cooked(&self) -> bool {
        match self.state {
            IngredientState::Raw => !self.choppable,
            IngredientState::Chopped => true,
            IngredientState::Cooked => false,
        }
    }

    /// Raw -> Chopped. Returns false (and changes nothing) otherwise.
    pub fn chop(&mut self) -> bool {
        if !self.can_be_chopped() {
            return false;
        }
        self.state = IngredientState::Chopped;
        true
    }

    /// -> Cooked. Returns false (and changes nothing) if the stove would not
    /// accept it.
    pub fn cook(&mut self) -> bool {
        if !self.can_be_cooked() {
            return false;
        }
        self.state = IngredientState::Cooked;
        true
    }
}

impl fmt::Display for Ingredient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.state, self.name)
    }
}

// ---------------------------------------------------------------------------
// Dish
// ---------------------------------------------------------------------------

/// Prepared ingredients in the order they were added.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dish {
    components: Vec<Ingredient>,
}

impl Dish {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_component(&mut self, ingredient: Ingredient) {
        self.components.push(ingredient);
    }

    pub fn components(&self) -> &[Ingredient] {
        &self.components
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Component names, in order.
    pub fn component_names(&self) -> Vec<&str> {
        self.components.iter().map(Ingredient::name).collect()
    }
}

impl fmt::Display for Dish {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.components.is_empty() {
            return f.write_str("empty dish");
        }
        for (i, c) in self.components.iter().enumerate() {
            if i > 0 {
                f.write_str(" + ")?;
            }
            write!(f, "{c}")?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Plate
// ---------------------------------------------------------------------------

/// A plate. Holds at most one dish; a dirty plate holds none.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plate {
    clean: bool,
    dish: Option<Dish>,
}

impl Default for Plate {
    fn default() -> Self {
        Self::new()
    }
}

impl Plate {
    /// A clean, empty plate.
    pub fn new() -> Self {
        Self {
            clean: true,
            dish: None,
        }
    }

    pub fn is_clean(&self) -> bool {
        self.clean
    }

    pub fn dish(&self) -> Option<&Dish> {
        self.dish.as_ref()
    }

    /// True when the plate carries a dish with at least one component.
    pub fn has_food(&self) -> bool {
        self.dish.as_ref().is_some_and(|d| !d.is_empty())
    }

    /// Fold an ingredient into the plate's dish, creating the dish on the
    /// first component. A dirty plate refuses and hands the ingredient back.
    pub fn add_to_dish(&mut self, ingredient: Ingredient) -> Result<(), Ingredient> {
        if !self.clean {
            return Err(ingredient);
        }
        self.dish.get_or_insert_with(Dish::new).add_component(ingredient);
        Ok(())
    }

    /// Remove and return the dish.
    pub fn take_dish(&mut self) -> Option<Dish> {
        self.dish.take()
    }

    /// Mark dirty. Any dish is dropped with it.
    pub fn mark_dirty(&mut self) {
        self.clean = false;
        self.dish = None;
    }

    pub fn wash(&mut self) {
        self.clean = true;
    }
}

// ---------------------------------------------------------------------------
// Item
// ---------------------------------------------------------------------------

/// Anything a chef can carry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Item {
    Ingredient(Ingredient),
    Plate(Plate),
}

impl Item {
    pub fn as_ingredient(&self) -> Option<&Ingredient> {
        match self {
            Item::Ingredient(i) => Some(i),
            Item::Plate(_) => None,
        }
    }

    pub fn as_plate(&self) -> Option<&Plate> {
        match self {
            Item::Plate(p) => Some(p),
            Item::Ingredient(_) => None,
        }
    }
}

impl From<Ingredient> for Item {
    fn from(ingredient: Ingredient) -> Self {
        Item::Ingredient(ingredient)
    }
}

impl From<Plate> for Item {
    fn from(plate: Plate) -> Self {
        Item::Plate(plate)
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Item::Ingredient(i) => write!(f, "{i}"),
            Item::Plate(p) => match (p.is_clean(), p.dish()) {
                (false, _) => f.write_str("dirty plate"),
                (true, Some(d)) => write!(f, "plate of {d}"),
                (true, None) => f.write_str("clean plate"),
            },
        }
    }
}
