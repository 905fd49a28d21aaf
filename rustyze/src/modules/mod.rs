pub mod firestore;
pub mod vehicles;
