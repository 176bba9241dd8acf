pub mod test_find;
pub mod test_gsub;
