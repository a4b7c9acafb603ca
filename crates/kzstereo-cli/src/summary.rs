use console::Style;
use kzstereo_core::params::NormalizedParameters;

struct Styles {
    title: Style,
    header: Style,
    label: Style,
    value: Style,
    method: Style,
}

impl Styles {
    fn new() -> Self {
        Self {
            title: Style::new().cyan().bold(),
            header: Style::new().cyan().bold(),
            label: Style::new().dim(),
            value: Style::new().bold().white(),
            method: Style::new().green(),
        }
    }
}

/// Print the normalized weights to stderr.
pub fn print_parameter_summary(
    normalized: &NormalizedParameters,
    range: (i32, i32),
    seed: u64,
    solver: &str,
) {
    let s = Styles::new();
    let p = &normalized.params;

    eprintln!();
    eprintln!("  {}", s.title.apply_to("Stereo Matching"));
    eprintln!("  {}", s.title.apply_to("\u{2550}".repeat(15)));
    eprintln!();

    eprintln!(
        "  {:<14}{}",
        s.label.apply_to("Solver"),
        s.method.apply_to(solver)
    );
    eprintln!(
        "  {:<14}{}",
        s.label.apply_to("Data cost"),
        s.method.apply_to(p.data_cost)
    );
    eprintln!(
        "  {:<14}{}",
        s.label.apply_to("Disparities"),
        s.value.apply_to(format!("{} .. {}", range.0, range.1))
    );
    eprintln!(
        "  {:<14}{}",
        s.label.apply_to("Iterations"),
        s.value.apply_to(p.max_iterations)
    );
    eprintln!(
        "  {:<14}{}",
        s.label.apply_to("Random order"),
        s.value.apply_to(p.randomize_every_iteration)
    );
    eprintln!(
        "  {:<14}{}",
        s.label.apply_to("Seed"),
        s.value.apply_to(seed)
    );
    eprintln!();

    eprintln!("  {}", s.header.apply_to("Weights"));
    eprintln!(
        "    {:<12}{}",
        s.label.apply_to("Denominator"),
        s.value.apply_to(p.denominator)
    );
    eprintln!(
        "    {:<12}{}",
        s.label.apply_to("K"),
        s.value.apply_to(p.occlusion_cost)
    );
    eprintln!(
        "    {:<12}{}",
        s.label.apply_to("lambda1"),
        s.value.apply_to(p.lambda1)
    );
    eprintln!(
        "    {:<12}{}",
        s.label.apply_to("lambda2"),
        s.value.apply_to(p.lambda2)
    );
    eprintln!(
        "    {:<12}{}",
        s.label.apply_to("lambda"),
        s.value.apply_to(normalized.lambda)
    );
    eprintln!(
        "    {:<12}{}",
        s.label.apply_to("Threshold"),
        s.value.apply_to(p.edge_threshold)
    );
    eprintln!();
}
