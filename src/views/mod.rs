mod home;
mod not_found;
mod shift_group;

pub use home::Home;
pub use not_found::NotFound;
pub use shift_group::ShiftGroup;
