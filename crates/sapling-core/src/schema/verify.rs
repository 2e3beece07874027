use super::{Entity, Polymorphism, Schema};
use crate::{Error, Result};

struct Verify<'a> {
    schema: &'a Schema,
}

impl Schema {
    pub(super) fn verify(&self) -> Result<()> {
        Verify { schema: self }.verify()
    }
}

impl Verify<'_> {
    fn verify(&self) -> Result<()> {
        for entity in self.schema.entities() {
            self.verify_identity(entity)?;
            self.verify_variants_are_descendants(entity)?;
            self.verify_inverses(entity)?;
        }

        Ok(())
    }

    fn verify_identity(&self, entity: &Entity) -> Result<()> {
        let Some(identity) = entity.identity_attribute() else {
            if entity.is_concrete() {
                return Err(Error::invalid_schema(format!(
                    "concrete entity `{}` has no identity attribute",
                    entity.name
                )));
            }
            return Ok(());
        };

        if !identity.ty.is_key() {
            return Err(Error::invalid_schema(format!(
                "identity attribute `{}.{}` has type {}, which cannot identify objects",
                entity.name, identity.name, identity.ty
            )));
        }

        if identity.key_path.is_none() {
            return Err(Error::invalid_schema(format!(
                "identity attribute `{}.{}` has no key path",
                entity.name, identity.name
            )));
        }

        Ok(())
    }

    fn verify_variants_are_descendants(&self, entity: &Entity) -> Result<()> {
        let Some(Polymorphism::Discriminator { variants, .. }) = entity.polymorphism() else {
            return Ok(());
        };

        for (value, variant) in variants {
            if !self.schema.is_kind_of(*variant, entity) {
                return Err(Error::invalid_schema(format!(
                    "variant `{}` of `{}` maps to `{}`, which does not inherit from it",
                    value,
                    entity.name,
                    self.schema.entity(*variant).name
                )));
            }
        }

        Ok(())
    }

    fn verify_inverses(&self, entity: &Entity) -> Result<()> {
        for rel in &entity.relationships {
            let Some(name) = &rel.inverse else {
                continue;
            };

            let target = self.schema.entity(rel.target);
            let Some(inverse) = target.relationship_by_name(name) else {
                return Err(Error::invalid_schema(format!(
                    "inverse `{}` of `{}.{}` is not a relationship of `{}`",
                    name, entity.name, rel.name, target.name
                )));
            };

            if !self.schema.is_kind_of(entity, inverse.target) {
                return Err(Error::invalid_schema(format!(
                    "inverse `{}.{}` of `{}.{}` targets `{}`",
                    target.name,
                    inverse.name,
                    entity.name,
                    rel.name,
                    self.schema.entity(inverse.target).name
                )));
            }
        }

        Ok(())
    }
}
