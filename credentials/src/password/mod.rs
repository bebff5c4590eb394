pub mod salted;

pub use salted::generate_salt;
pub use salted::SaltedHasher;
