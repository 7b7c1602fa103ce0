//! Response payloads, decoupled from the stored rows. New versions get a new module.

pub mod v1;
