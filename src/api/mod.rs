pub mod hellogold;
