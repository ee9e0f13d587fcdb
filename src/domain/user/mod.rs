//! User aggregate
//!
//! Contains the User and UserProfile entities, role groups, DTOs, and
//! repository interface.

pub mod model;
pub mod permissions;
pub mod repository;

mod dto;

pub use model::{Language, User, UserProfile, UserRole};
pub use permissions::{all_groups, group_for, RoleGroup};

pub use dto::{CreateUserDto, GetUserDto, UpdateProfileDto, UpdateUserDto};

pub use repository::UserRepository;
