pub mod common;




#[cfg(test)]
mod test_experience;

#[cfg(test)]
mod test_snapshots;
