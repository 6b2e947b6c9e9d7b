//! Model declarations and associations between them.

use crate::error::DbError;

/// Association kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssociationKind {
    /// Single reference stored as `<name>Id`
    BelongsTo,
    /// Reference list stored as `<model>Ids`
    HasMany,
}

/// Association from one model to another.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Association {
    /// Accessor name on the owning model
    pub name: String,
    /// Target model name
    pub model: String,
    /// Association kind
    pub kind: AssociationKind,
    /// Attribute holding the referenced id(s)
    pub foreign_key: String,
}

impl Association {
    /// Declares a belongsTo association; the key is `<name>Id`.
    pub fn belongs_to(name: &str, model: &str) -> Self {
        Self {
            name: name.to_string(),
            model: model.to_string(),
            kind: AssociationKind::BelongsTo,
            foreign_key: format!("{}Id", name),
        }
    }

    /// Declares a hasMany association; the key is `<model>Ids`.
    pub fn has_many(name: &str, model: &str) -> Self {
        Self {
            name: name.to_string(),
            model: model.to_string(),
            kind: AssociationKind::HasMany,
            foreign_key: format!("{}Ids", model),
        }
    }
}

/// Declared model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelDef {
    /// Model name (e.g. `studentType`)
    pub name: String,
    /// Collection name (e.g. `studentTypes`)
    pub collection: String,
    /// Associations owned by the model
    pub associations: Vec<Association>,
}

impl ModelDef {
    /// Looks up an association by accessor name.
    pub fn association(&self, name: &str) -> Result<&Association, DbError> {
        self.associations
            .iter()
            .find(|a| a.name == name)
            .ok_or_else(|| DbError::AssociationNotFound {
                model: self.name.clone(),
                association: name.to_string(),
            })
    }
}

/// Set of declared models.
#[derive(Debug, Clone, Default)]
pub struct Schema {
    models: Vec<ModelDef>,
}

impl Schema {
    /// Creates an empty schema.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a model declaration.
    pub fn model(mut self, name: &str, collection: &str, associations: Vec<Association>) -> Self {
        self.models.push(ModelDef {
            name: name.to_string(),
            collection: collection.to_string(),
            associations,
        });
        self
    }

    /// Returns all models in declaration order.
    pub fn models(&self) -> &[ModelDef] {
        &self.models
    }

    /// Resolves a model by model name or collection name.
    pub fn get(&self, name: &str) -> Result<&ModelDef, DbError> {
        self.models
            .iter()
            .find(|m| m.name == name || m.collection == name)
            .ok_or_else(|| DbError::ModelNotFound {
                model: name.to_string(),
            })
    }

    /// Yields `(owner, association)` pairs whose target is `model`.
    pub fn dependents_of<'a>(
        &'a self,
        model: &'a str,
    ) -> impl Iterator<Item = (&'a ModelDef, &'a Association)> + 'a {
        self.models.iter().flat_map(move |owner| {
            owner
                .associations
                .iter()
                .filter(move |a| a.model == model)
                .map(move |a| (owner, a))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schema() -> Schema {
        Schema::new()
            .model("studentType", "studentTypes", vec![])
            .model(
                "student",
                "students",
                vec![
                    Association::has_many("studentCourses", "studentCourse"),
                    Association::belongs_to("type", "studentType"),
                ],
            )
            .model("studentCourse", "studentCourses", vec![])
    }

    #[test]
    fn test_foreign_keys() {
        let schema = schema();
        let student = schema.get("student").unwrap();
        assert_eq!(student.association("type").unwrap().foreign_key, "typeId");
        assert_eq!(
            student.association("studentCourses").unwrap().foreign_key,
            "studentCourseIds"
        );
        assert!(matches!(
            student.association("teacher"),
            Err(DbError::AssociationNotFound { .. })
        ));
    }

    #[test]
    fn test_lookup_by_collection_name() {
        let schema = schema();
        assert_eq!(schema.get("studentTypes").unwrap().name, "studentType");
        assert!(matches!(
            schema.get("teachers"),
            Err(DbError::ModelNotFound { .. })
        ));
    }

    #[test]
    fn test_dependents_of() {
        let schema = schema();
        let deps: Vec<_> = schema
            .dependents_of("studentType")
            .map(|(owner, a)| (owner.name.clone(), a.name.clone()))
            .collect();
        assert_eq!(deps, vec![("student".to_string(), "type".to_string())]);
    }
}
