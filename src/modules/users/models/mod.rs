pub mod user;

pub use user::{
    CreateUserRequest, UpdateUserRequest, User, UserPatch, UserStatus, REFERRAL_CODE_LENGTH,
    USER_POLICY,
};
