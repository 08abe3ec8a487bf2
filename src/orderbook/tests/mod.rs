#[cfg(test)]
mod book_tests;
#[cfg(test)]
mod matching_tests;
#[cfg(test)]
mod snapshot_tests;
