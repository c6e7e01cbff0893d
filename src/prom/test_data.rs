/// One family of every type, written the way a well-behaved exporter would.
pub const COMPLETE_EXPOSITION: &str = r#"# HELP http_requests_total The total number of HTTP requests.
# TYPE http_requests_total counter
http_requests_total{method="post",code="200"} 1027 1395066363000
http_requests_total{method="post",code="400"} 3 1395066363000
# HELP process_resident_memory_bytes Resident memory size in bytes.
# TYPE process_resident_memory_bytes gauge
process_resident_memory_bytes 2.4576e+07
# HELP http_request_duration_seconds A histogram of the request duration.
# TYPE http_request_duration_seconds histogram
http_request_duration_seconds_bucket{le="0.05"} 24054
http_request_duration_seconds_bucket{le="0.1"} 33444
http_request_duration_seconds_bucket{le="0.2"} 100392
http_request_duration_seconds_bucket{le="0.5"} 129389
http_request_duration_seconds_bucket{le="1"} 133988
http_request_duration_seconds_bucket{le="+Inf"} 144320
http_request_duration_seconds_sum 53423
http_request_duration_seconds_count 144320
# HELP rpc_duration_seconds A summary of the RPC duration in seconds.
# TYPE rpc_duration_seconds summary
rpc_duration_seconds{quantile="0.01"} 3102
rpc_duration_seconds{quantile="0.05"} 3272
rpc_duration_seconds{quantile="0.5"} 4773
rpc_duration_seconds{quantile="0.9"} 9001
rpc_duration_seconds{quantile="0.99"} 76656
rpc_duration_seconds_sum 1.7560473e+07
rpc_duration_seconds_count 2693
"#;

/// Families interleaved and out of alphabetical order.
pub const UNORDERED_FAMILIES: &str = r#"# HELP zeta_total Last letter first.
# TYPE zeta_total counter
zeta_total{shard="1"} 4
alpha 1
zeta_total{shard="2"} 5
# HELP mid_bytes Somewhere in between.
# TYPE mid_bytes gauge
mid_bytes 512
"#;

/// Inputs that stress escaping, special floats and label ordering.
pub const AWKWARD_EXPOSITION: &str = r#"# HELP escaped_info Help with a backslash \\ and a newline \n in it.
# TYPE escaped_info gauge
escaped_info{path="C:\\temp",quote="say \"hi\"",multi="a\nb"} 1
escaped_info{quote="x",path="y",multi="z"} NaN 1700000000000
# HELP specials Infinite and tiny values.
specials{kind="pos"} +Inf
specials{kind="neg"} -Inf
specials{kind="tiny"} 1e-300
specials{kind="huge"} 1.5e300
specials{kind="zero"} -0
# HELP empty_help
empty_help 0
no_help{ a="1" , } 42 -5
"#;

/// Untyped families whose names end in a summary or histogram suffix of an
/// unrelated typed family.
pub const SUFFIXED_UNTYPED: &[&str] = &[
    "# HELP x help\nx_count 1\n# TYPE x summary\nx{quantile=\"0.5\"} 2\n",
    "# TYPE x summary\n# TYPE x_sum untyped\nx_sum 2\nx{quantile=\"0.5\"} 1\n",
    "y_bucket{le=\"1\"} 1\n# TYPE y histogram\ny_bucket{le=\"2\"} 2\ny_sum 3\n",
];
