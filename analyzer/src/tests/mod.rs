#[cfg(test)]
mod test_diagnostics;
#[cfg(test)]
mod test_lexer;
#[cfg(test)]
mod test_recovery;
