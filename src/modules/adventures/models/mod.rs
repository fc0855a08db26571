pub mod adventure;

pub use adventure::{
    Adventure, AdventurePatch, AdventureStatus, CreateAdventureRequest, UpdateAdventureRequest,
    ADVENTURE_POLICY, JOIN_CODE_LENGTH,
};
