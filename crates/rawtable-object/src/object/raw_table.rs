//! Raw table engine.
//!
//! Unchecked, generic table operations over any [`TableBackend`]. Values are
//! wrapped in a [`ValueBox`] on the way in and unwrapped on the way out.
//! Nothing here validates handle provenance or value types across calls;
//! that is the object layer's job, and only the object layer can reach
//! these functions.

use rawtable_core::{ObjectId, StoreError, StoreResult, TableBackend, TableInfo};
use serde::Serialize;

use super::value_box::ValueBox;

/// Create the metadata record for `handle`.
pub(in crate::object) fn create<B>(backend: &mut B, handle: ObjectId) -> StoreResult<()>
where
    B: TableBackend,
{
    backend.new_table(handle)
}

/// Add a new entry. Fails with `KeyAlreadyExists` if `key` is present.
pub(in crate::object) fn add<B, K, V>(
    backend: &mut B,
    handle: ObjectId,
    key: &K,
    val: V,
) -> StoreResult<()>
where
    B: TableBackend,
    K: Serialize + ?Sized,
    V: Serialize + Send + 'static,
{
    backend.add_box(handle, key, ValueBox::new(val))
}

/// Shared view of the value under `key`. Fails with `KeyNotFound` if absent.
pub(in crate::object) fn borrow<'a, B, K, V>(
    backend: &'a B,
    handle: ObjectId,
    key: &K,
) -> StoreResult<&'a V>
where
    B: TableBackend,
    K: Serialize + ?Sized,
    V: Serialize + Send + 'static,
{
    backend
        .borrow_box::<K, ValueBox<V>>(handle, key)
        .map(|boxed| boxed.get())
}

/// The value under `key`, or `default` if absent. Never mutates the table.
pub(in crate::object) fn borrow_with_default<'a, B, K, V>(
    backend: &'a B,
    handle: ObjectId,
    key: &K,
    default: &'a V,
) -> StoreResult<&'a V>
where
    B: TableBackend,
    K: Serialize + ?Sized,
    V: Serialize + Send + 'static,
{
    if contains(backend, handle, key)? {
        borrow(backend, handle, key)
    } else {
        Ok(default)
    }
}

/// Exclusive view of the value under `key`. Fails with `KeyNotFound` if absent.
pub(in crate::object) fn borrow_mut<'a, B, K, V>(
    backend: &'a mut B,
    handle: ObjectId,
    key: &K,
) -> StoreResult<&'a mut V>
where
    B: TableBackend,
    K: Serialize + ?Sized,
    V: Serialize + Send + 'static,
{
    backend
        .borrow_box_mut::<K, ValueBox<V>>(handle, key)
        .map(|boxed| boxed.get_mut())
}

/// Exclusive view of the value under `key`, inserting `default` first if absent.
///
/// The insert and the borrow are charged together, so a failure leaves no
/// new entry behind.
pub(in crate::object) fn borrow_mut_with_default<'a, B, K, V>(
    backend: &'a mut B,
    handle: ObjectId,
    key: &K,
    default: V,
) -> StoreResult<&'a mut V>
where
    B: TableBackend,
    K: Serialize + ?Sized,
    V: Serialize + Send + 'static,
{
    if contains(backend, handle, key)? {
        borrow_mut(backend, handle, key)
    } else {
        backend
            .add_box_mut(handle, key, ValueBox::new(default))
            .map(|boxed| boxed.get_mut())
    }
}

/// Insert `val` under `key`, replacing any existing value in place.
pub(in crate::object) fn upsert<B, K, V>(
    backend: &mut B,
    handle: ObjectId,
    key: &K,
    val: V,
) -> StoreResult<()>
where
    B: TableBackend,
    K: Serialize + ?Sized,
    V: Serialize + Send + 'static,
{
    if !contains(backend, handle, key)? {
        add(backend, handle, key, val)
    } else {
        *borrow_mut(backend, handle, key)? = val;
        Ok(())
    }
}

/// Remove the entry under `key` and return its value. Fails with `KeyNotFound` if absent.
pub(in crate::object) fn remove<B, K, V>(
    backend: &mut B,
    handle: ObjectId,
    key: &K,
) -> StoreResult<V>
where
    B: TableBackend,
    K: Serialize + ?Sized,
    V: Serialize + Send + 'static,
{
    backend
        .remove_box::<K, ValueBox<V>>(handle, key)
        .map(ValueBox::into_inner)
}

pub(in crate::object) fn contains<B, K>(backend: &B, handle: ObjectId, key: &K) -> StoreResult<bool>
where
    B: TableBackend,
    K: Serialize + ?Sized,
{
    backend.contains_box(handle, key)
}

/// Number of live entries.
pub(in crate::object) fn length<B>(backend: &B, handle: ObjectId) -> StoreResult<u64>
where
    B: TableBackend,
{
    backend.box_length(handle)
}

pub(in crate::object) fn is_empty<B>(backend: &B, handle: ObjectId) -> StoreResult<bool>
where
    B: TableBackend,
{
    Ok(length(backend, handle)? == 0)
}

/// Metadata record for `handle`.
pub(in crate::object) fn info<B>(backend: &B, handle: ObjectId) -> StoreResult<TableInfo>
where
    B: TableBackend,
{
    backend.table_info(handle)
}

/// Destroy the table if it has no entries, else `TableNotEmpty`.
pub(in crate::object) fn destroy_empty<B>(backend: &mut B, handle: ObjectId) -> StoreResult<()>
where
    B: TableBackend,
{
    let size = length(backend, handle)?;
    if size != 0 {
        return Err(StoreError::TableNotEmpty { handle, size });
    }
    drop_unchecked(backend, handle)
}

/// Destroy the table and everything in it, without any checks.
pub(in crate::object) fn drop_unchecked<B>(backend: &mut B, handle: ObjectId) -> StoreResult<()>
where
    B: TableBackend,
{
    backend.drop_table(handle)
}
