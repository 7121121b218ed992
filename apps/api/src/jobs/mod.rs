// Job descriptions: created by admins, read-only input to screening.

pub mod handlers;
