//! Command-chain completion: chains exist only behind an explicit receiver.

use super::assist_dsl::{ClassSpec, class_, t};
use crate::context::AssistLocation;

fn chain() -> ClassSpec {
    class_("com.demo.Chain")
        .method("first", "com.demo.Chain", &[("String", "arg")])
        .method("second", "com.demo.Chain", &[("String", "arg")])
        .method("third", "com.demo.Chain", &[("String", "arg")])
}

#[test]
fn chain_tail_completes_against_the_link_type() {
    t("def start = new Chain()\nstart.first 'foo' sec$0")
        .with(chain())
        .expect_location(AssistLocation::Expression)
        .expect_count("second", 1);
}

#[test]
fn bare_identifier_sequence_gets_no_chain_proposals() {
    t("first 'foo' third sec$0")
        .with(chain())
        .expect_count("second", 0);
}

#[test]
fn longer_chains_keep_resolving_left_to_right() {
    t("def start = new Chain()\nstart.first 'foo' second 'bar' thi$0")
        .with(chain())
        .expect_location(AssistLocation::Expression)
        .expect_count("third", 1);
}

#[test]
fn chain_on_unknown_receiver_offers_nothing() {
    t("mystery.first 'foo' sec$0")
        .with(chain())
        .expect_count("second", 0);
}
