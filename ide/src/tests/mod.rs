#[cfg(test)]
mod assist_dsl;
#[cfg(test)]
mod test_chains;
#[cfg(test)]
mod test_constructors;
#[cfg(test)]
mod test_extended_context;
#[cfg(test)]
mod test_rank;
#[cfg(test)]
mod test_registry;
#[cfg(test)]
mod test_scope;
#[cfg(test)]
mod test_types_imports;
