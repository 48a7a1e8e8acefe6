//! Material catalog module
//!
//! This module provides:
//! - Material categories for shop stock
//! - Material definitions (visual descriptor plus rough economics)
//! - Catalog management with id resolution
//! - The standard seeded catalog of common species

use crate::error::PartError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Material categories for organization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Hash)]
#[serde(rename_all = "snake_case")]
pub enum MaterialCategory {
    /// Hardwood species (oak, walnut, maple, cherry)
    Hardwood,
    /// Softwood species (pine, fir, cedar)
    Softwood,
    /// Sheet goods (plywood, MDF)
    SheetGood,
    /// Non-lumber shop stock
    Hardware,
}

impl std::fmt::Display for MaterialCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Hardwood => write!(f, "Hardwood"),
            Self::Softwood => write!(f, "Softwood"),
            Self::SheetGood => write!(f, "Sheet Good"),
            Self::Hardware => write!(f, "Hardware"),
        }
    }
}

/// Material identifier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct MaterialId(pub String);

impl std::fmt::Display for MaterialId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for MaterialId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Complete material definition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Material {
    /// Unique material identifier
    pub id: MaterialId,
    /// Display name
    pub name: String,
    /// Material category
    pub category: MaterialCategory,
    /// Species name for wood materials (e.g., "Black Walnut")
    pub species: String,
    /// Brief description
    pub description: String,
    /// Diffuse texture asset path, if one exists
    pub texture: Option<String>,
    /// Fallback display color as RGB floats in [0,1], used when no texture loads
    pub color: Option<[f32; 3]>,
    /// Rough cost per board foot in dollars
    pub cost_per_board_foot: Option<f64>,
    /// Whether this is a user-defined custom material
    pub custom: bool,
    /// Notes and tips
    pub notes: String,
}

impl Material {
    /// Create a new material with basic properties
    pub fn new(id: MaterialId, name: String, category: MaterialCategory, species: String) -> Self {
        Self {
            id,
            name,
            category,
            species,
            description: String::new(),
            texture: None,
            color: None,
            cost_per_board_foot: None,
            custom: false,
            notes: String::new(),
        }
    }

    /// The denormalized descriptor a part carries
    pub fn to_ref(&self) -> MaterialRef {
        MaterialRef {
            id: self.id.clone(),
            name: self.name.clone(),
            texture: self.texture.clone(),
            color: self.color,
        }
    }
}

/// The material descriptor embedded in every part record
///
/// Resolved from the catalog at part creation and then carried on the part,
/// so a saved project renders correctly even if the catalog changes later.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialRef {
    /// Catalog id this descriptor was resolved from
    pub id: MaterialId,
    /// Display name at resolution time
    pub name: String,
    /// Diffuse texture asset path, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub texture: Option<String>,
    /// Fallback display color, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<[f32; 3]>,
}

/// Material catalog - manages the collection of materials
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaterialCatalog {
    /// Collection of materials by ID
    materials: HashMap<MaterialId, Material>,
}

impl MaterialCatalog {
    /// Create a new empty catalog
    pub fn new() -> Self {
        Self {
            materials: HashMap::new(),
        }
    }

    /// Add a material to the catalog
    pub fn add_material(&mut self, material: Material) {
        self.materials.insert(material.id.clone(), material);
    }

    /// Get a material by ID
    pub fn get_material(&self, id: &MaterialId) -> Option<&Material> {
        self.materials.get(id)
    }

    /// Get a mutable reference to a material
    pub fn get_material_mut(&mut self, id: &MaterialId) -> Option<&mut Material> {
        self.materials.get_mut(id)
    }

    /// Resolve a material id, failing if it is not in the catalog
    pub fn resolve(&self, id: &MaterialId) -> Result<&Material, PartError> {
        self.materials.get(id).ok_or_else(|| PartError::MaterialNotFound {
            id: id.to_string(),
        })
    }

    /// Remove a material from the catalog
    pub fn remove_material(&mut self, id: &MaterialId) -> Option<Material> {
        self.materials.remove(id)
    }

    /// Get all materials
    pub fn get_all_materials(&self) -> Vec<&Material> {
        self.materials.values().collect()
    }

    /// Get all materials in a specific category
    pub fn get_materials_by_category(&self, category: MaterialCategory) -> Vec<&Material> {
        self.materials
            .values()
            .filter(|m| m.category == category)
            .collect()
    }

    /// Search materials by name or species (partial match, case-insensitive)
    pub fn search_by_name(&self, query: &str) -> Vec<&Material> {
        let query_lower = query.to_lowercase();
        self.materials
            .values()
            .filter(|m| {
                m.name.to_lowercase().contains(&query_lower)
                    || m.species.to_lowercase().contains(&query_lower)
            })
            .collect()
    }

    /// Get the number of materials in the catalog
    pub fn len(&self) -> usize {
        self.materials.len()
    }

    /// Check if the catalog is empty
    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }
}

impl Default for MaterialCatalog {
    fn default() -> Self {
        Self::new()
    }
}

/// Initialize the standard catalog with common shop species
pub fn standard_catalog() -> MaterialCatalog {
    let mut catalog = MaterialCatalog::new();

    // Black Walnut
    let mut walnut = Material::new(
        MaterialId("wood_walnut".to_string()),
        "Walnut".to_string(),
        MaterialCategory::Hardwood,
        "Black Walnut".to_string(),
    );
    walnut.description = "Dark American hardwood, prized for furniture".to_string();
    walnut.color = Some([0.4, 0.3, 0.2]);
    walnut.cost_per_board_foot = Some(12.0);
    catalog.add_material(walnut);

    // Red Oak
    let mut red_oak = Material::new(
        MaterialId("wood_oak_red".to_string()),
        "Red Oak".to_string(),
        MaterialCategory::Hardwood,
        "Red Oak".to_string(),
    );
    red_oak.description = "Dense, open-grained American hardwood".to_string();
    red_oak.color = Some([0.65, 0.5, 0.4]);
    red_oak.cost_per_board_foot = Some(6.0);
    catalog.add_material(red_oak);

    // Hard Maple
    let mut maple = Material::new(
        MaterialId("wood_maple".to_string()),
        "Maple".to_string(),
        MaterialCategory::Hardwood,
        "Hard Maple".to_string(),
    );
    maple.description = "Pale, fine-grained hardwood; takes finish evenly".to_string();
    maple.color = Some([0.9, 0.85, 0.7]);
    maple.cost_per_board_foot = Some(7.0);
    catalog.add_material(maple);

    // Cherry
    let mut cherry = Material::new(
        MaterialId("wood_cherry".to_string()),
        "Cherry".to_string(),
        MaterialCategory::Hardwood,
        "Black Cherry".to_string(),
    );
    cherry.description = "Reddish hardwood that darkens with age".to_string();
    cherry.color = Some([0.7, 0.4, 0.3]);
    cherry.cost_per_board_foot = Some(9.0);
    catalog.add_material(cherry);

    // Eastern White Pine
    let mut pine = Material::new(
        MaterialId("wood_pine".to_string()),
        "Pine".to_string(),
        MaterialCategory::Softwood,
        "Eastern White Pine".to_string(),
    );
    pine.description = "Light, knotty softwood for shop and utility builds".to_string();
    pine.color = Some([0.85, 0.75, 0.6]);
    pine.cost_per_board_foot = Some(3.0);
    catalog.add_material(pine);

    // Baltic Birch plywood
    let mut birch_ply = Material::new(
        MaterialId("sheet_ply_birch".to_string()),
        "Baltic Birch Plywood".to_string(),
        MaterialCategory::SheetGood,
        "Birch".to_string(),
    );
    birch_ply.description = "Void-free plywood for jigs and casework".to_string();
    birch_ply.color = Some([0.88, 0.8, 0.65]);
    birch_ply.cost_per_board_foot = Some(4.0);
    catalog.add_material(birch_ply);

    catalog
}
