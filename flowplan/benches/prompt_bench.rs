//! Benchmarks for prompt rendering and schema validation.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use flowplan::core::{ExplicitStepSequence, StepKind};
use flowplan::planner::{plan_schema, render_plan_prompt, PlanOptions};
use flowplan::testing::{sample_catalog, sample_context, three_step_plan};

fn prompt_benchmark(c: &mut Criterion) {
    let context = sample_context();
    let catalog = sample_catalog();
    let wide_context: Vec<_> = (0..20).flat_map(|_| catalog.context_items()).collect();
    let sequence = ExplicitStepSequence::default()
        .step(StepKind::Trigger, "When a row is added")
        .step(StepKind::Router, "Only large orders")
        .step(StepKind::Action, "Email the sales team");

    c.bench_function("render_default_prompt", |b| {
        let options = PlanOptions::new();
        b.iter(|| render_plan_prompt(black_box("Post new rows to Slack"), &context, &options));
    });

    c.bench_function("render_prompt_with_sequence", |b| {
        let options = PlanOptions::new().with_explicit_steps(sequence.clone());
        b.iter(|| render_plan_prompt(black_box("Post new rows to Slack"), &context, &options));
    });

    c.bench_function("render_prompt_wide_context", |b| {
        let options = PlanOptions::new().with_custom_prompt("Plan for a sales team.");
        b.iter(|| render_plan_prompt(black_box("Post new rows to Slack"), &wide_context, &options));
    });

    c.bench_function("validate_plan_schema", |b| {
        let schema = plan_schema();
        let plan = three_step_plan();
        b.iter(|| schema.validate(black_box(&plan)));
    });
}

criterion_group!(benches, prompt_benchmark);
criterion_main!(benches);
