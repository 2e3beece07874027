use super::{
    Attribute, AttributeId, AttributeType, Cardinality, Entity, EntityId, EntityKind,
    MergePolicy, OrphanPolicy, Polymorphism, Relationship, RelationshipId, Schema,
};
use crate::{Error, KeyPath, Result};
use indexmap::IndexMap;

/// Declares entities by name and resolves them into a [`Schema`].
///
/// ```
/// use sapling_core::schema::{AttributeDef, AttributeType, RelationshipDef, Schema};
///
/// let mut builder = Schema::builder();
///
/// builder
///     .entity("Publisher")
///     .identity("identifier")
///     .attribute(AttributeDef::new("identifier", AttributeType::Integer).key_path("id"))
///     .attribute(AttributeDef::new("name", AttributeType::String));
///
/// builder
///     .entity("Character")
///     .identity("identifier")
///     .attribute(AttributeDef::new("identifier", AttributeType::Integer).key_path("id"))
///     .relationship(RelationshipDef::to_one("publisher", "Publisher"));
///
/// let schema = builder.build().unwrap();
/// assert!(schema.entity_by_name("Character").is_some());
/// ```
#[derive(Debug, Default)]
pub struct Builder {
    entities: IndexMap<String, EntityDef>,
}

#[derive(Debug, Clone)]
pub struct EntityDef {
    name: String,
    parent: Option<String>,
    identity: Option<String>,
    attributes: Vec<AttributeDef>,
    relationships: Vec<RelationshipDef>,
    discriminator: Option<String>,
    variants: Vec<(String, String)>,
    entity_mapper: Option<String>,
    dictionary_transformer: Option<String>,
}

#[derive(Debug, Clone)]
pub struct AttributeDef {
    name: String,
    ty: AttributeType,
    key_path: Option<String>,
    transformer: Option<String>,
    nullable: bool,
}

#[derive(Debug, Clone)]
pub struct RelationshipDef {
    name: String,
    target: String,
    cardinality: Cardinality,
    key_path: Option<String>,
    orphans: OrphanPolicy,
    merge: MergePolicy,
    inverse: Option<String>,
    by_identity: bool,
}

/// Members of one entity after inheritance has been applied.
#[derive(Clone, Default)]
struct Members {
    identity: Option<String>,
    attributes: Vec<AttributeDef>,
    relationships: Vec<RelationshipDef>,
}

impl Builder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the definition for `name`, declaring it on first use.
    pub fn entity(&mut self, name: &str) -> &mut EntityDef {
        self.entities
            .entry(name.to_string())
            .or_insert_with(|| EntityDef::new(name))
    }

    pub fn build(&self) -> Result<Schema> {
        let ids: IndexMap<&str, EntityId> = self
            .entities
            .keys()
            .enumerate()
            .map(|(index, name)| (name.as_str(), EntityId(index)))
            .collect();

        let lookup = |name: &str, what: &str| -> Result<EntityId> {
            ids.get(name).copied().ok_or_else(|| {
                Error::invalid_schema(format!("{what} refers to unknown entity `{name}`"))
            })
        };

        let mut parents = Vec::with_capacity(self.entities.len());
        for def in self.entities.values() {
            let parent = match &def.parent {
                Some(parent) => Some(lookup(parent, &format!("parent of `{}`", def.name))?),
                None => None,
            };
            parents.push(parent);
        }

        let order = inheritance_order(&self.entities, &parents)?;

        // Parents are resolved before their children, so each child starts
        // from a fully resolved member list.
        let mut members: Vec<Option<Members>> = vec![None; self.entities.len()];
        for index in order {
            let def = &self.entities[index];
            let inherited = match parents[index] {
                Some(parent) => members[parent.0].clone().expect("parent resolved first"),
                None => Members::default(),
            };
            members[index] = Some(def.merge_into(inherited));
        }

        let mut schema = Schema::default();

        for (index, def) in self.entities.values().enumerate() {
            let id = EntityId(index);
            let members = members[index].take().expect("all entities resolved");

            let attributes = members
                .attributes
                .iter()
                .enumerate()
                .map(|(index, attr)| attr.to_attribute(AttributeId { entity: id, index }))
                .collect::<Vec<_>>();

            let relationships = members
                .relationships
                .iter()
                .enumerate()
                .map(|(index, rel)| {
                    let target = lookup(&rel.target, &format!("`{}.{}`", def.name, rel.name))?;
                    Ok(rel.to_relationship(RelationshipId { entity: id, index }, target))
                })
                .collect::<Result<Vec<_>>>()?;

            let identity = match &members.identity {
                Some(name) => Some(
                    attributes
                        .iter()
                        .position(|attr| &attr.name == name)
                        .ok_or_else(|| {
                            Error::invalid_schema(format!(
                                "identity attribute `{name}` is not an attribute of `{}`",
                                def.name
                            ))
                        })?,
                ),
                None => None,
            };

            let kind = def.kind(&lookup)?;

            schema.entities.insert(
                id,
                Entity {
                    id,
                    name: def.name.clone(),
                    parent: parents[index],
                    kind,
                    identity,
                    attributes,
                    relationships,
                    dictionary_transformer: def.dictionary_transformer.clone(),
                },
            );
        }

        schema.verify()?;

        Ok(schema)
    }
}

/// Orders entities so that every parent comes before its children. Fails on
/// inheritance cycles.
fn inheritance_order(
    entities: &IndexMap<String, EntityDef>,
    parents: &[Option<EntityId>],
) -> Result<Vec<usize>> {
    #[derive(Clone, Copy, PartialEq)]
    enum Mark {
        None,
        Visiting,
        Done,
    }

    let mut marks = vec![Mark::None; parents.len()];
    let mut order = Vec::with_capacity(parents.len());

    for start in 0..parents.len() {
        let mut path = vec![];
        let mut current = Some(start);

        while let Some(index) = current {
            match marks[index] {
                Mark::Done => break,
                Mark::Visiting => {
                    return Err(Error::invalid_schema(format!(
                        "entity `{}` inherits from itself",
                        entities[index].name
                    )));
                }
                Mark::None => {
                    marks[index] = Mark::Visiting;
                    path.push(index);
                    current = parents[index].map(|parent| parent.0);
                }
            }
        }

        for index in path.into_iter().rev() {
            marks[index] = Mark::Done;
            order.push(index);
        }
    }

    Ok(order)
}

impl EntityDef {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            parent: None,
            identity: None,
            attributes: vec![],
            relationships: vec![],
            discriminator: None,
            variants: vec![],
            entity_mapper: None,
            dictionary_transformer: None,
        }
    }

    /// Inherit attributes, relationships and the identity attribute from
    /// `parent`.
    pub fn parent(&mut self, parent: &str) -> &mut Self {
        self.parent = Some(parent.to_string());
        self
    }

    /// Name the attribute that identifies instances.
    pub fn identity(&mut self, attribute: &str) -> &mut Self {
        self.identity = Some(attribute.to_string());
        self
    }

    /// Add an attribute. An attribute with the same name as an inherited one
    /// overrides it.
    pub fn attribute(&mut self, attribute: AttributeDef) -> &mut Self {
        self.attributes.push(attribute);
        self
    }

    /// Add a relationship. A relationship with the same name as an inherited
    /// one overrides it.
    pub fn relationship(&mut self, relationship: RelationshipDef) -> &mut Self {
        self.relationships.push(relationship);
        self
    }

    /// Make the entity abstract, resolved by the value at `key_path`.
    pub fn discriminator(&mut self, key_path: &str) -> &mut Self {
        self.discriminator = Some(key_path.to_string());
        self
    }

    /// Map a discriminator value to an entity.
    pub fn variant(&mut self, value: &str, entity: &str) -> &mut Self {
        self.variants.push((value.to_string(), entity.to_string()));
        self
    }

    /// Make the entity abstract, resolved by a named entity mapper.
    pub fn entity_mapper(&mut self, name: &str) -> &mut Self {
        self.entity_mapper = Some(name.to_string());
        self
    }

    /// Rewrite incoming JSON objects with a named dictionary transformer.
    pub fn dictionary_transformer(&mut self, name: &str) -> &mut Self {
        self.dictionary_transformer = Some(name.to_string());
        self
    }

    fn merge_into(&self, mut members: Members) -> Members {
        if self.identity.is_some() {
            members.identity = self.identity.clone();
        }

        for attr in &self.attributes {
            match members.attributes.iter_mut().find(|a| a.name == attr.name) {
                Some(inherited) => *inherited = attr.clone(),
                None => members.attributes.push(attr.clone()),
            }
        }

        for rel in &self.relationships {
            match members.relationships.iter_mut().find(|r| r.name == rel.name) {
                Some(inherited) => *inherited = rel.clone(),
                None => members.relationships.push(rel.clone()),
            }
        }

        members
    }

    fn kind(&self, lookup: &impl Fn(&str, &str) -> Result<EntityId>) -> Result<EntityKind> {
        match (&self.discriminator, &self.entity_mapper) {
            (Some(_), Some(_)) => Err(Error::invalid_schema(format!(
                "`{}` declares both a discriminator and an entity mapper",
                self.name
            ))),
            (Some(key_path), None) => {
                let mut variants = IndexMap::new();
                for (value, entity) in &self.variants {
                    let target = lookup(entity, &format!("variant `{value}` of `{}`", self.name))?;
                    variants.insert(value.clone(), target);
                }
                Ok(EntityKind::Abstract(Polymorphism::Discriminator {
                    key_path: KeyPath::new(key_path),
                    variants,
                }))
            }
            (None, Some(mapper)) if self.variants.is_empty() => {
                Ok(EntityKind::Abstract(Polymorphism::Mapper(mapper.clone())))
            }
            (None, _) if !self.variants.is_empty() => Err(Error::invalid_schema(format!(
                "`{}` declares variants without a discriminator",
                self.name
            ))),
            (None, _) => Ok(EntityKind::Concrete),
        }
    }
}

impl AttributeDef {
    /// An attribute read from the JSON key of the same name.
    pub fn new(name: &str, ty: AttributeType) -> Self {
        Self {
            name: name.to_string(),
            ty,
            key_path: Some(name.to_string()),
            transformer: None,
            nullable: true,
        }
    }

    pub fn key_path(mut self, key_path: &str) -> Self {
        self.key_path = Some(key_path.to_string());
        self
    }

    /// Keep the attribute out of JSON mapping and serialization.
    pub fn unmapped(mut self) -> Self {
        self.key_path = None;
        self
    }

    pub fn transformer(mut self, name: &str) -> Self {
        self.transformer = Some(name.to_string());
        self
    }

    pub fn required(mut self) -> Self {
        self.nullable = false;
        self
    }

    fn to_attribute(&self, id: AttributeId) -> Attribute {
        Attribute {
            id,
            name: self.name.clone(),
            key_path: self.key_path.as_deref().map(KeyPath::new),
            ty: self.ty,
            transformer: self.transformer.clone(),
            nullable: self.nullable,
        }
    }
}

impl RelationshipDef {
    pub fn new(name: &str, target: &str, cardinality: Cardinality) -> Self {
        Self {
            name: name.to_string(),
            target: target.to_string(),
            cardinality,
            key_path: Some(name.to_string()),
            orphans: OrphanPolicy::default(),
            merge: MergePolicy::default(),
            inverse: None,
            by_identity: false,
        }
    }

    pub fn to_one(name: &str, target: &str) -> Self {
        Self::new(name, target, Cardinality::ToOne)
    }

    pub fn ordered_to_many(name: &str, target: &str) -> Self {
        Self::new(name, target, Cardinality::OrderedToMany)
    }

    pub fn to_many(name: &str, target: &str) -> Self {
        Self::new(name, target, Cardinality::UnorderedToMany)
    }

    pub fn key_path(mut self, key_path: &str) -> Self {
        self.key_path = Some(key_path.to_string());
        self
    }

    pub fn unmapped(mut self) -> Self {
        self.key_path = None;
        self
    }

    pub fn orphans(mut self, policy: OrphanPolicy) -> Self {
        self.orphans = policy;
        self
    }

    pub fn merge(mut self, policy: MergePolicy) -> Self {
        self.merge = policy;
        self
    }

    pub fn inverse(mut self, name: &str) -> Self {
        self.inverse = Some(name.to_string());
        self
    }

    pub fn by_identity(mut self) -> Self {
        self.by_identity = true;
        self
    }

    fn to_relationship(&self, id: RelationshipId, target: EntityId) -> Relationship {
        Relationship {
            id,
            name: self.name.clone(),
            key_path: self.key_path.as_deref().map(KeyPath::new),
            target,
            cardinality: self.cardinality,
            orphans: self.orphans,
            merge: self.merge,
            inverse: self.inverse.clone(),
            by_identity: self.by_identity,
        }
    }
}
