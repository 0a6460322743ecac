//! Project-nature registry: active natures run exactly once per request,
//! inactive natures never run.

use std::cell::Cell;
use std::rc::Rc;

use super::assist_dsl::t;
use crate::completion::{Proposal, ProposalKind};
use crate::context::AssistContext;
use crate::registry::{ProposalFilter, ProposalProvider};

struct CountingProvider {
    invocations: Rc<Cell<u32>>,
    name: &'static str,
}

impl ProposalProvider for CountingProvider {
    fn provide(&self, ctx: &AssistContext<'_>) -> Vec<Proposal> {
        self.invocations.set(self.invocations.get() + 1);
        vec![Proposal::new(
            self.name,
            self.name,
            ProposalKind::Keyword,
            self.name,
            ctx.prefix_span,
        )]
    }
}

struct DroppingFilter {
    consulted: Rc<Cell<bool>>,
    drop_name: &'static str,
}

impl ProposalFilter for DroppingFilter {
    fn retain(&self, _ctx: &AssistContext<'_>, proposal: &Proposal) -> bool {
        self.consulted.set(true);
        proposal.name != self.drop_name
    }
}

#[test]
fn active_nature_provider_runs_exactly_once() {
    let invocations = Rc::new(Cell::new(0));
    let mut fixture = t("$0");
    fixture.registry.register_provider(
        "groovy",
        Box::new(CountingProvider {
            invocations: Rc::clone(&invocations),
            name: "fromNature",
        }),
    );

    fixture.nature("groovy").expect_contains("fromNature");
    assert_eq!(invocations.get(), 1);
}

#[test]
fn inactive_nature_provider_never_runs() {
    let invocations = Rc::new(Cell::new(0));
    let mut fixture = t("$0");
    fixture.registry.register_provider(
        "groovy",
        Box::new(CountingProvider {
            invocations: Rc::clone(&invocations),
            name: "fromNature",
        }),
    );

    fixture.expect_not_contains("fromNature");
    assert_eq!(invocations.get(), 0);
}

#[test]
fn active_filter_suppresses_proposals() {
    let consulted = Rc::new(Cell::new(false));
    let mut fixture = t("$0");
    fixture.registry.register_provider(
        "groovy",
        Box::new(CountingProvider {
            invocations: Rc::new(Cell::new(0)),
            name: "dropMe",
        }),
    );
    fixture.registry.register_filter(
        "groovy",
        Box::new(DroppingFilter {
            consulted: Rc::clone(&consulted),
            drop_name: "dropMe",
        }),
    );

    fixture.nature("groovy").expect_not_contains("dropMe");
    assert!(consulted.get());
}

#[test]
fn inactive_filter_is_never_consulted() {
    let consulted = Rc::new(Cell::new(false));
    let mut fixture = t("def loc = 1\nlo$0");
    fixture.registry.register_filter(
        "groovy",
        Box::new(DroppingFilter {
            consulted: Rc::clone(&consulted),
            drop_name: "loc",
        }),
    );

    fixture.expect_contains("loc");
    assert!(!consulted.get());
}

#[test]
fn natures_compose_independently() {
    let first = Rc::new(Cell::new(0));
    let second = Rc::new(Cell::new(0));
    let mut fixture = t("$0");
    fixture.registry.register_provider(
        "groovy",
        Box::new(CountingProvider {
            invocations: Rc::clone(&first),
            name: "fromGroovy",
        }),
    );
    fixture.registry.register_provider(
        "grails",
        Box::new(CountingProvider {
            invocations: Rc::clone(&second),
            name: "fromGrails",
        }),
    );

    fixture
        .nature("groovy")
        .expect_contains("fromGroovy")
        .expect_not_contains("fromGrails");
    assert_eq!(first.get(), 1);
    assert_eq!(second.get(), 0);
}
