//! Provide the member layout of composite types.
//!
//! A [`MemberModel`] is computed once per type and fixes the wire layout:
//! base members first, recursively, then the type's own members in
//! declaration order.

use alloc::boxed::Box;
use alloc::sync::Arc;
use alloc::vec::Vec;

use ez_reflect::info::{MemberFlags, SerializationConfig, Type};
use ez_reflect::member::{MemberAttributes, MemberDescriptor};
use ez_reflect::registry::{BaseInfo, TypeMeta, TypeRegistry};

use crate::SerializationError;

// -----------------------------------------------------------------------------
// ModelMember

/// One serialized member and the base projections leading to it.
#[derive(Debug, Clone)]
pub struct ModelMember {
    bases: Box<[BaseInfo]>,
    descriptor: Arc<MemberDescriptor>,
}

impl ModelMember {
    /// Projections from the composite to the declaring base, outermost first.
    /// Empty for the type's own members.
    #[inline]
    pub fn bases(&self) -> &[BaseInfo] {
        &self.bases
    }

    #[inline]
    pub fn descriptor(&self) -> &Arc<MemberDescriptor> {
        &self.descriptor
    }

    #[inline]
    pub fn name(&self) -> &'static str {
        self.descriptor.name()
    }
}

// -----------------------------------------------------------------------------
// MemberModel

/// The ordered members of a composite type and the configuration that
/// selected them.
///
/// # Examples
///
/// ```
/// use ez_reflect::derive::Reflect;
/// use ez_reflect::TypeRegistry;
/// use ez_reflect::info::Type;
/// use ez_serial::MemberModel;
///
/// #[derive(Reflect, Default)]
/// #[reflect(serializable, default)]
/// struct Entity {
///     pub id: u32,
/// }
///
/// #[derive(Reflect, Default)]
/// #[reflect(serializable, default)]
/// struct Player {
///     #[reflect(base)]
///     pub entity: Entity,
///     pub name: String,
///     #[reflect(non_serialized)]
///     pub cached_rank: u32,
/// }
///
/// let mut registry = TypeRegistry::new();
/// registry.register::<Player>();
///
/// let model = MemberModel::build(&registry, Type::of::<Player>()).unwrap();
/// assert_eq!(model.names().collect::<Vec<_>>(), ["id", "name"]);
/// ```
#[derive(Debug, Clone)]
pub struct MemberModel {
    ty: Type,
    config: SerializationConfig,
    members: Box<[ModelMember]>,
}

impl MemberModel {
    /// Selects the serialized members of `ty`.
    ///
    /// # Errors
    ///
    /// - [`NotRegistered`]: `ty` or one of its bases is unknown to `registry`.
    /// - [`InheritanceViolation`]: `ty` has no configuration of its own and
    ///   the nearest configured base does not pass it on.
    /// - [`UnsupportedType`]: neither `ty` nor a base is configured.
    ///
    /// [`NotRegistered`]: SerializationError::NotRegistered
    /// [`InheritanceViolation`]: SerializationError::InheritanceViolation
    /// [`UnsupportedType`]: SerializationError::UnsupportedType
    pub fn build(registry: &TypeRegistry, ty: Type) -> Result<Self, SerializationError> {
        let meta = registry
            .get(ty.id())
            .ok_or(SerializationError::NotRegistered { type_path: ty.path() })?;
        let config = effective_config(registry, meta)?;

        let mut members = Vec::new();
        let mut bases = Vec::new();
        collect(registry, meta, &config, &mut bases, &mut members)?;

        log::debug!("member model of `{}`: {} member(s)", ty.path(), members.len());
        Ok(Self {
            ty,
            config,
            members: members.into_boxed_slice(),
        })
    }

    #[inline]
    pub const fn ty(&self) -> Type {
        self.ty
    }

    /// The configuration in effect, possibly inherited from a base.
    #[inline]
    pub const fn config(&self) -> &SerializationConfig {
        &self.config
    }

    #[inline]
    pub fn members(&self) -> &[ModelMember] {
        &self.members
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Member names in wire order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.members.iter().map(ModelMember::name)
    }
}

/// Returns the configuration of `meta`, or the one inherited from its
/// nearest configured base.
pub(crate) fn effective_config(
    registry: &TypeRegistry,
    meta: &TypeMeta,
) -> Result<SerializationConfig, SerializationError> {
    if let Some(config) = meta.serialization() {
        return Ok(*config);
    }
    let configured = registry
        .base_chain(meta.type_id())
        .into_iter()
        .find_map(|base| registry.get(base.id()).and_then(|m| m.serialization().map(|c| (base, *c))));

    match configured {
        Some((_, config)) if config.inherit_to_derived_types => Ok(config),
        Some((base, _)) => Err(SerializationError::InheritanceViolation {
            derived: meta.type_path(),
            base: base.path(),
        }),
        None => Err(SerializationError::UnsupportedType { type_path: meta.type_path() }),
    }
}

fn collect(
    registry: &TypeRegistry,
    meta: &TypeMeta,
    config: &SerializationConfig,
    bases: &mut Vec<BaseInfo>,
    out: &mut Vec<ModelMember>,
) -> Result<(), SerializationError> {
    if let Some(base) = meta.base() {
        let base_meta = registry
            .get(base.ty().id())
            .ok_or(SerializationError::NotRegistered { type_path: base.ty().path() })?;
        // Composition keeps base chains acyclic; the bound guards bad metadata.
        if bases.len() <= registry.iter().len() {
            bases.push(base.clone());
            collect(registry, base_meta, config, bases, out)?;
            bases.pop();
        }
    }

    for member in meta.members() {
        if is_selected(member, config) {
            out.push(ModelMember {
                bases: bases.clone().into_boxed_slice(),
                descriptor: member.clone(),
            });
        }
    }
    Ok(())
}

fn is_selected(member: &MemberDescriptor, config: &SerializationConfig) -> bool {
    let excluded = MemberAttributes::NON_SERIALIZED | MemberAttributes::BASE;
    if member.is_static() || member.attributes().intersects(excluded) {
        return false;
    }

    let flags = config.member_flags;
    let public = member.visibility().is_public();

    if member.is_field() {
        if member.is_read_only() {
            return false;
        }
        return if public {
            flags.contains(MemberFlags::PUBLIC_FIELDS)
        } else {
            member.attributes().contains(MemberAttributes::SERIALIZE_FIELD)
                || (flags.contains(MemberFlags::NON_PUBLIC_FIELDS) && !config.require_explicit_field_opt_in)
        };
    }

    let wanted = if public {
        MemberFlags::PUBLIC_PROPERTIES
    } else {
        MemberFlags::NON_PUBLIC_PROPERTIES
    };
    if !flags.contains(wanted) {
        return false;
    }
    if !member.can_read() || !member.can_write() {
        log::warn!(
            "skipping property `{}::{}`: it needs both a getter and a setter",
            member.declaring_type().path(),
            member.name(),
        );
        return false;
    }
    true
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use ez_reflect::TypeRegistry;
    use ez_reflect::info::{MemberFlags, SerializationConfig, Type, TypeInfo};
    use ez_reflect::member::{MemberAttributes, MemberDescriptor, Visibility};
    use ez_reflect::registry::TypeMeta;

    use super::MemberModel;
    use crate::SerializationError;

    #[derive(Default)]
    struct Account {
        id: u32,
        secret: u64,
        pinned: u64,
        balance: i64,
        label: i32,
    }

    impl Account {
        fn balance(&self) -> i64 {
            self.balance
        }

        fn set_balance(&mut self, value: i64) {
            self.balance = value;
        }
    }

    fn account_meta(config: SerializationConfig) -> TypeMeta {
        let mut meta = TypeMeta::new::<Account>(TypeInfo::Struct);
        meta.push_member(MemberDescriptor::field::<Account, u32>("id", Visibility::Public, |a| &a.id, Some(|a| &mut a.id)));
        meta.push_member(MemberDescriptor::field::<Account, u64>(
            "secret",
            Visibility::NonPublic,
            |a| &a.secret,
            Some(|a| &mut a.secret),
        ));
        meta.push_member(
            MemberDescriptor::field::<Account, u64>("pinned", Visibility::NonPublic, |a| &a.pinned, Some(|a| &mut a.pinned))
                .with_attributes(MemberAttributes::SERIALIZE_FIELD),
        );
        meta.push_member(MemberDescriptor::property::<Account, i64>(
            "balance",
            Visibility::Public,
            Some(Account::balance),
            Some(Account::set_balance),
        ));
        meta.push_member(MemberDescriptor::property::<Account, i32>("label", Visibility::Public, Some(|a| a.label), None));
        meta.set_serialization(config);
        meta
    }

    fn names(config: SerializationConfig) -> Vec<&'static str> {
        let mut registry = TypeRegistry::empty();
        registry.insert_type_meta(account_meta(config));
        let model = MemberModel::build(&registry, Type::of::<Account>()).unwrap();
        model.names().collect()
    }

    #[test]
    fn default_config_takes_all_fields() {
        assert_eq!(names(SerializationConfig::default()), ["id", "secret", "pinned"]);
    }

    #[test]
    fn explicit_opt_in_filters_non_public_fields() {
        let config = SerializationConfig {
            require_explicit_field_opt_in: true,
            ..SerializationConfig::default()
        };
        assert_eq!(names(config), ["id", "pinned"]);
    }

    #[test]
    fn properties_need_getter_and_setter() {
        let config = SerializationConfig::new(MemberFlags::PUBLIC_FIELDS | MemberFlags::PUBLIC_PROPERTIES);
        assert_eq!(names(config), ["id", "pinned", "balance"]);
    }

    #[test]
    fn unconfigured_types_are_unsupported() {
        let mut registry = TypeRegistry::empty();
        registry.insert_type_meta(TypeMeta::new::<Account>(TypeInfo::Struct));
        let err = MemberModel::build(&registry, Type::of::<Account>()).unwrap_err();
        assert!(matches!(err, SerializationError::UnsupportedType { .. }));

        let err = MemberModel::build(&registry, Type::of::<u8>()).unwrap_err();
        assert!(matches!(err, SerializationError::NotRegistered { .. }));
    }
}
