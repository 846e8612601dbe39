pub mod brother;
pub mod container;
pub mod item;
pub mod reservation;
pub mod shelf;
pub mod storage_unit;
