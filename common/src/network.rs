pub mod address;
pub mod destination;
pub mod family;
