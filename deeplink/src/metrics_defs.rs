use shared::metrics_defs::{MetricDef, MetricType};

pub const REQUEST_DURATION: MetricDef = MetricDef {
    name: "request.duration",
    metric_type: MetricType::Histogram,
    description: "Time to build a response, in seconds. Tagged with status.",
};

pub const LINKS_RESOLVED: MetricDef = MetricDef {
    name: "links.resolved",
    metric_type: MetricType::Counter,
    description: "Link requests answered. Tagged with kind, platform and strategy.",
};

pub const ALL_METRICS: &[MetricDef] = &[REQUEST_DURATION, LINKS_RESOLVED];
