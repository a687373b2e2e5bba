//! Record schema: named, typed fields with a declared merge policy.
//!
//! The schema is fixed when the graph is built. Fields that are not declared behave as
//! kind `Any` with overwrite policy. At run time the executor uses the schema to seed
//! the record ([`Schema::initialize`]) and to fold step output back in
//! ([`Schema::merge`], [`Schema::merge_parallel`]).

mod field;
mod merge;

pub use field::{Field, FieldKind, Presence};
pub use merge::{Combine, CombineFn, MergePolicy};

use std::collections::BTreeMap;

use serde_json::Value;

use crate::error::RunError;
use crate::graph::CompilationError;
use crate::record::Record;

static UNDECLARED: MergePolicy = MergePolicy::Overwrite;

/// Immutable set of field declarations.
#[derive(Clone, Debug, Default)]
pub struct Schema {
    fields: BTreeMap<String, Field>,
}

impl Schema {
    /// A schema with no declared fields: everything is `Any` + overwrite.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builder() -> SchemaBuilder {
        SchemaBuilder::default()
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.get(name)
    }

    pub fn fields(&self) -> impl Iterator<Item = &Field> {
        self.fields.values()
    }

    /// Merge policy of `name`; undeclared fields overwrite.
    pub fn policy(&self, name: &str) -> &MergePolicy {
        self.fields.get(name).map(|f| &f.policy).unwrap_or(&UNDECLARED)
    }

    fn kind(&self, name: &str) -> FieldKind {
        self.fields.get(name).map(|f| f.kind).unwrap_or(FieldKind::Any)
    }

    /// Builds the starting record: declared defaults, then the caller's values as given.
    ///
    /// Caller values are set directly (not merged). Fails when a value does not fit its
    /// field kind or a required field is absent.
    pub fn initialize(&self, initial: Record) -> Result<Record, RunError> {
        let mut record = Record::new();
        for field in self.fields.values() {
            if let Presence::Default(value) = &field.presence {
                record.insert(field.name.clone(), value.clone());
            }
        }
        for (key, value) in initial {
            self.check_kind(&key, &value, None)?;
            record.insert(key, value);
        }
        for field in self.fields.values() {
            if field.presence == Presence::Required && !record.contains(&field.name) {
                return Err(RunError::MissingField(field.name.clone()));
            }
        }
        Ok(record)
    }

    /// Folds one step's partial record into `record`, field by field.
    pub fn merge(&self, record: &mut Record, step: &str, update: Record) -> Result<(), RunError> {
        for (key, value) in update {
            self.merge_field(record, step, key, value)?;
        }
        Ok(())
    }

    /// Single merge point for fan-out branches.
    ///
    /// `updates` must be in branch declaration order; accumulate fields are combined in
    /// that order, so the result does not depend on which branch finished first. Two
    /// branches writing different values to the same overwrite field is an error.
    pub fn merge_parallel(
        &self,
        record: &mut Record,
        updates: Vec<(String, Record)>,
    ) -> Result<(), RunError> {
        let mut overwrites: BTreeMap<String, (Value, Vec<String>)> = BTreeMap::new();
        for (step, update) in &updates {
            for (key, value) in update {
                if !self.policy(key).is_overwrite() {
                    continue;
                }
                match overwrites.get_mut(key) {
                    Some((first, writers)) => {
                        writers.push(step.clone());
                        if *first != *value {
                            return Err(RunError::ConflictingWrite {
                                field: key.clone(),
                                steps: writers.clone(),
                            });
                        }
                    }
                    None => {
                        overwrites.insert(key.clone(), (value.clone(), vec![step.clone()]));
                    }
                }
            }
        }

        for (step, update) in updates {
            for (key, value) in update {
                if self.policy(&key).is_overwrite() {
                    // identical duplicate writes were accepted above; apply the first only
                    if let Some((_, writers)) = overwrites.get(&key) {
                        if writers.first() != Some(&step) {
                            continue;
                        }
                    }
                }
                self.merge_field(record, &step, key, value)?;
            }
        }
        Ok(())
    }

    fn merge_field(
        &self,
        record: &mut Record,
        step: &str,
        key: String,
        value: Value,
    ) -> Result<(), RunError> {
        let merged = match self.policy(&key) {
            MergePolicy::Overwrite => value,
            MergePolicy::Accumulate(combine) => combine
                .apply(record.get(&key), value)
                .map_err(|message| RunError::Merge {
                    field: key.clone(),
                    step: step.to_string(),
                    message,
                })?,
        };
        self.check_kind(&key, &merged, Some(step))?;
        record.insert(key, merged);
        Ok(())
    }

    fn check_kind(&self, key: &str, value: &Value, step: Option<&str>) -> Result<(), RunError> {
        let kind = self.kind(key);
        if kind.admits(value) {
            return Ok(());
        }
        Err(RunError::FieldType {
            field: key.to_string(),
            expected: kind.to_string(),
            found: FieldKind::describe(value).to_string(),
            step: step.map(ToString::to_string),
        })
    }
}

/// Collects field declarations and validates them in [`build`](SchemaBuilder::build).
#[derive(Default)]
pub struct SchemaBuilder {
    fields: Vec<Field>,
}

impl SchemaBuilder {
    pub fn field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    /// Validates the declarations: unique names, defaults admitted by their kind, and
    /// combination rules compatible with the kind.
    pub fn build(self) -> Result<Schema, CompilationError> {
        let mut fields = BTreeMap::new();
        for field in self.fields {
            if field.name.is_empty() {
                return Err(CompilationError::InvalidField {
                    field: field.name,
                    reason: "field name must not be empty".into(),
                });
            }
            if let Presence::Default(value) = &field.presence {
                if !field.kind.admits(value) {
                    return Err(CompilationError::InvalidField {
                        reason: format!(
                            "default {} is not a {}",
                            FieldKind::describe(value),
                            field.kind
                        ),
                        field: field.name,
                    });
                }
            }
            if let MergePolicy::Accumulate(combine) = &field.policy {
                if !combine.supports(field.kind) {
                    return Err(CompilationError::InvalidField {
                        reason: format!("{:?} cannot accumulate a {} field", combine, field.kind),
                        field: field.name,
                    });
                }
            }
            if fields.contains_key(&field.name) {
                return Err(CompilationError::DuplicateField(field.name));
            }
            fields.insert(field.name.clone(), field);
        }
        Ok(Schema { fields })
    }
}
