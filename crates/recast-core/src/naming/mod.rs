pub mod accessor;
pub mod type_name;

// Re-export common types
pub use accessor::{decapitalize, property_name_for_accessor, property_name_for_setter};
pub use type_name::TypeName;
