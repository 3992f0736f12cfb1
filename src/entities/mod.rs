pub mod favorite_entry;
