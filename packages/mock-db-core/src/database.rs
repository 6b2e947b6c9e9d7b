//! Database container managing one collection per declared model.

use std::collections::HashMap;
use std::sync::RwLock;

use serde_json::{Map, Value};

use crate::collection::Collection;
use crate::error::DbError;
use crate::record::{foreign_id, Attrs, Record, RecordId};
use crate::schema::{AssociationKind, ModelDef, Schema};

/// Foreign key that does not resolve to an existing record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DanglingReference {
    /// Owning model
    pub model: String,
    /// Owning record id
    pub id: RecordId,
    /// Association name
    pub association: String,
    /// Target model
    pub target: String,
    /// Referenced id that is missing
    pub missing_id: RecordId,
}

impl std::fmt::Display for DanglingReference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}#{}.{} -> {}#{} (missing)",
            self.model, self.id, self.association, self.target, self.missing_id
        )
    }
}

/// Database container holding every collection of a schema.
#[derive(Debug)]
pub struct Database {
    schema: Schema,
    /// Map of model name to collection
    collections: RwLock<HashMap<String, Collection>>,
}

impl Database {
    /// Creates an empty database with one collection per model.
    pub fn new(schema: Schema) -> Self {
        let collections = schema
            .models()
            .iter()
            .map(|m| (m.name.clone(), Collection::new(m.name.clone())))
            .collect();
        Self {
            schema,
            collections: RwLock::new(collections),
        }
    }

    /// Returns the schema.
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Creates a record.
    ///
    /// # Arguments
    /// * `model` - Model or collection name
    /// * `attrs` - Attributes, optionally carrying an explicit `id`
    ///
    /// # Returns
    /// `Result<Record, DbError>` containing the stored record.
    pub fn create(&self, model: &str, attrs: Attrs) -> Result<Record, DbError> {
        let def = self.schema.get(model)?;
        let mut collections = self.collections.write().map_err(|_| DbError::LockPoisoned)?;
        let record = collection_mut(&mut collections, def)?.insert(attrs)?;
        tracing::trace!(model = %def.name, id = record.id, "record created");
        Ok(record)
    }

    /// Returns every record of a model in insertion order.
    pub fn all(&self, model: &str) -> Result<Vec<Record>, DbError> {
        self.read(model, |c| c.all().to_vec())
    }

    /// Finds a record by id.
    pub fn find(&self, model: &str, id: RecordId) -> Result<Option<Record>, DbError> {
        self.read(model, |c| c.find(id).cloned())
    }

    /// Finds the first record whose attributes match the query.
    pub fn find_by(&self, model: &str, query: &Attrs) -> Result<Option<Record>, DbError> {
        self.read(model, |c| c.find_by(query).cloned())
    }

    /// Returns all records whose attributes match the query.
    pub fn where_eq(&self, model: &str, query: &Attrs) -> Result<Vec<Record>, DbError> {
        self.read(model, |c| c.where_eq(query).into_iter().cloned().collect())
    }

    /// Number of records stored for a model.
    pub fn record_count(&self, model: &str) -> Result<usize, DbError> {
        self.read(model, Collection::len)
    }

    /// Merges attributes into an existing record.
    pub fn update(&self, model: &str, id: RecordId, attrs: Attrs) -> Result<Record, DbError> {
        let def = self.schema.get(model)?;
        let mut collections = self.collections.write().map_err(|_| DbError::LockPoisoned)?;
        collection_mut(&mut collections, def)?.update(id, attrs)
    }

    /// Removes a record and detaches every reference to it.
    ///
    /// belongsTo keys pointing at the record become null; hasMany id
    /// lists drop it.
    pub fn destroy(&self, model: &str, id: RecordId) -> Result<Record, DbError> {
        let def = self.schema.get(model)?;
        let mut collections = self.collections.write().map_err(|_| DbError::LockPoisoned)?;
        let removed = collection_mut(&mut collections, def)?.remove(id)?;

        for (owner, association) in self.schema.dependents_of(&def.name) {
            let owners = collection_mut(&mut collections, owner)?;
            for record in owners.records_mut() {
                detach(record, &association.foreign_key, association.kind, id);
            }
        }
        tracing::trace!(model = %def.name, id, "record destroyed");
        Ok(removed)
    }

    /// Resolves a belongsTo association.
    ///
    /// # Returns
    /// `Ok(None)` when the key is null or points at a missing record.
    pub fn belongs_to(
        &self,
        model: &str,
        record: &Record,
        association: &str,
    ) -> Result<Option<Record>, DbError> {
        let assoc = self.schema.get(model)?.association(association)?;
        if assoc.kind != AssociationKind::BelongsTo {
            return Err(DbError::AssociationNotFound {
                model: model.to_string(),
                association: association.to_string(),
            });
        }
        match foreign_id(record.get(&assoc.foreign_key)) {
            Some(id) => self.find(&assoc.model, id),
            None => Ok(None),
        }
    }

    /// Resolves a hasMany association, skipping ids that do not resolve.
    pub fn has_many(
        &self,
        model: &str,
        record: &Record,
        association: &str,
    ) -> Result<Vec<Record>, DbError> {
        let assoc = self.schema.get(model)?.association(association)?;
        if assoc.kind != AssociationKind::HasMany {
            return Err(DbError::AssociationNotFound {
                model: model.to_string(),
                association: association.to_string(),
            });
        }
        let ids = id_list(record.get(&assoc.foreign_key));
        self.read(&assoc.model, |c| {
            ids.iter().filter_map(|id| c.find(*id).cloned()).collect()
        })
    }

    /// Serializes every collection, keyed by collection name.
    pub fn dump(&self) -> Result<Value, DbError> {
        let collections = self.collections.read().map_err(|_| DbError::LockPoisoned)?;
        let mut out = Map::new();
        for def in self.schema.models() {
            let records = collections
                .get(&def.name)
                .map(|c| {
                    c.all()
                        .iter()
                        .map(|r| Value::Object(r.to_json()))
                        .collect::<Vec<_>>()
                })
                .unwrap_or_default();
            out.insert(def.collection.clone(), Value::Array(records));
        }
        Ok(Value::Object(out))
    }

    /// Lists every foreign key that points at a missing record.
    pub fn dangling_references(&self) -> Result<Vec<DanglingReference>, DbError> {
        let collections = self.collections.read().map_err(|_| DbError::LockPoisoned)?;
        let mut dangling = Vec::new();

        for def in self.schema.models() {
            let Some(owners) = collections.get(&def.name) else {
                continue;
            };
            for association in &def.associations {
                let targets = collections.get(&association.model);
                for record in owners.all() {
                    let referenced: Vec<RecordId> = match association.kind {
                        AssociationKind::BelongsTo => foreign_id(record.get(&association.foreign_key))
                            .into_iter()
                            .collect(),
                        AssociationKind::HasMany => id_list(record.get(&association.foreign_key)),
                    };
                    for missing_id in referenced {
                        if targets.and_then(|t| t.find(missing_id)).is_none() {
                            dangling.push(DanglingReference {
                                model: def.name.clone(),
                                id: record.id,
                                association: association.name.clone(),
                                target: association.model.clone(),
                                missing_id,
                            });
                        }
                    }
                }
            }
        }
        Ok(dangling)
    }

    fn read<T>(&self, model: &str, f: impl FnOnce(&Collection) -> T) -> Result<T, DbError> {
        let def = self.schema.get(model)?;
        let collections = self.collections.read().map_err(|_| DbError::LockPoisoned)?;
        let collection = collections
            .get(&def.name)
            .ok_or_else(|| DbError::ModelNotFound {
                model: def.name.clone(),
            })?;
        Ok(f(collection))
    }
}

fn collection_mut<'a>(
    collections: &'a mut HashMap<String, Collection>,
    def: &ModelDef,
) -> Result<&'a mut Collection, DbError> {
    collections
        .get_mut(&def.name)
        .ok_or_else(|| DbError::ModelNotFound {
            model: def.name.clone(),
        })
}

fn id_list(value: Option<&Value>) -> Vec<RecordId> {
    match value {
        Some(Value::Array(items)) => items.iter().filter_map(|v| foreign_id(Some(v))).collect(),
        _ => Vec::new(),
    }
}

fn detach(record: &mut Record, foreign_key: &str, kind: AssociationKind, id: RecordId) {
    match kind {
        AssociationKind::BelongsTo => {
            if foreign_id(record.get(foreign_key)) == Some(id) {
                record.attrs.insert(foreign_key.to_string(), Value::Null);
            }
        }
        AssociationKind::HasMany => {
            if let Some(Value::Array(items)) = record.attrs.get_mut(foreign_key) {
                items.retain(|v| foreign_id(Some(v)) != Some(id));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Association;
    use serde_json::json;

    fn attrs(value: Value) -> Attrs {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    fn db() -> Database {
        let schema = Schema::new()
            .model("studentType", "studentTypes", vec![])
            .model(
                "student",
                "students",
                vec![
                    Association::has_many("studentCourses", "studentCourse"),
                    Association::belongs_to("type", "studentType"),
                ],
            )
            .model("studentCourse", "studentCourses", vec![]);
        let db = Database::new(schema);
        db.create("studentType", attrs(json!({"name": "tester"})))
            .unwrap();
        db.create("studentCourse", attrs(json!({"courseId": 1})))
            .unwrap();
        db.create("studentCourse", attrs(json!({"courseId": 2})))
            .unwrap();
        db.create(
            "student",
            attrs(json!({"name": "Ann", "typeId": "1", "studentCourseIds": [1, "2", 7]})),
        )
        .unwrap();
        db
    }

    #[test]
    fn test_unknown_model() {
        let db = db();
        assert!(matches!(
            db.all("teacher"),
            Err(DbError::ModelNotFound { .. })
        ));
    }

    #[test]
    fn test_resolves_associations() {
        let db = db();
        let ann = db.find("students", 1).unwrap().unwrap();

        let kind = db.belongs_to("student", &ann, "type").unwrap().unwrap();
        assert_eq!(kind.get_str("name"), Some("tester"));

        let courses = db.has_many("student", &ann, "studentCourses").unwrap();
        assert_eq!(courses.iter().map(|c| c.id).collect::<Vec<_>>(), vec![1, 2]);

        assert!(db.belongs_to("student", &ann, "studentCourses").is_err());
    }

    #[test]
    fn test_destroy_detaches_dependents() {
        let db = db();
        db.destroy("studentType", 1).unwrap();
        db.destroy("studentCourse", 2).unwrap();

        let ann = db.find("student", 1).unwrap().unwrap();
        assert_eq!(ann.get("typeId"), Some(&Value::Null));
        assert_eq!(ann.get("studentCourseIds"), Some(&json!([1, 7])));
        assert!(db.belongs_to("student", &ann, "type").unwrap().is_none());
    }

    #[test]
    fn test_dangling_references() {
        let db = db();
        let dangling = db.dangling_references().unwrap();
        assert_eq!(dangling.len(), 1);
        assert_eq!(dangling[0].missing_id, 7);
        assert_eq!(dangling[0].target, "studentCourse");
    }

    #[test]
    fn test_dump_uses_collection_names() {
        let db = db();
        let dump = db.dump().unwrap();
        assert_eq!(dump["students"][0]["id"], json!("1"));
        assert_eq!(dump["studentCourses"].as_array().unwrap().len(), 2);
    }
}
