/*
[INPUT]:  Raw JSON elements from decoded responses
[OUTPUT]: Hydration context and generic resource types
[POS]:    Data layer - resource types shared by endpoint operations
[UPDATE]: When resource types are added
*/

pub mod resource;

pub use resource::*;
