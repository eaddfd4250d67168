//! Raw material intake (KYC)

use rust_decimal::Decimal;
use serde::Deserialize;
use validator::Validate;

use crate::error::AppResult;
use crate::store::{Collection, Store};
use shared::{
    new_record_id, next_serial_code, normalize_query, validate_not_blank, validate_percentage,
    Material, SerialPrefix, Unit,
};

/// Material service for raw material registration
#[derive(Clone)]
pub struct MaterialService {
    store: Store,
}

/// Input for registering a material
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateMaterialInput {
    #[validate(custom = "validate_not_blank")]
    pub material_name: String,
    #[serde(default)]
    pub unit: Unit,
    #[validate(custom = "validate_percentage")]
    pub loi: Decimal,
    #[serde(default)]
    pub remarks: String,
}

impl MaterialService {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// Register a material; it receives the next `ML-` serial number
    pub fn create_material(&self, input: CreateMaterialInput) -> AppResult<Material> {
        input.validate()?;

        let material = self
            .store
            .update(Collection::Materials, |materials: &mut Vec<Material>| {
                let material = Material {
                    id: new_record_id(),
                    serial_no: next_serial_code(SerialPrefix::Material, materials.len()),
                    material_name: input.material_name,
                    unit: input.unit,
                    loi: input.loi,
                    remarks: input.remarks,
                };
                materials.push(material.clone());
                Ok(material)
            })?;

        tracing::info!(
            serial_no = %material.serial_no,
            material_name = %material.material_name,
            "material registered"
        );
        Ok(material)
    }

    pub fn list_materials(&self) -> AppResult<Vec<Material>> {
        self.store.load(Collection::Materials)
    }

    /// First material registered under `name`
    pub fn find_by_name(&self, name: &str) -> AppResult<Option<Material>> {
        Ok(find_material(&self.list_materials()?, name).cloned())
    }

    /// Free-text search; a blank query returns every material
    pub fn search_materials(&self, query: &str) -> AppResult<Vec<Material>> {
        let materials = self.list_materials()?;
        let hits: Vec<Material> = match normalize_query(query) {
            Some(q) => materials.into_iter().filter(|m| m.matches_query(&q)).collect(),
            None => materials,
        };
        tracing::debug!(query, hits = hits.len(), "material search");
        Ok(hits)
    }
}

/// Names are unique by convention only, so the first match wins
pub(crate) fn find_material<'a>(materials: &'a [Material], name: &str) -> Option<&'a Material> {
    materials.iter().find(|m| m.material_name == name)
}
