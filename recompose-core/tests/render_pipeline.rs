//! End-to-end rendering over a realistic cluster snapshot.

use recompose_core::compose::RenderOptions;
use recompose_core::stacks::StackIndex;
use recompose_core::types::{
    LogDriver, MountSpec, NetworkAttachment, NetworkRecord, PortSpec, ResourceSpec, RestartPolicy,
    ServiceRecord, UpdateConfig, STACK_NAMESPACE_LABEL,
};
use recompose_core::render_stack;
use std::collections::{BTreeMap, HashMap};

fn labels(entries: &[(&str, &str)]) -> BTreeMap<String, String> {
    entries.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
}

fn snapshot() -> (Vec<ServiceRecord>, HashMap<String, NetworkRecord>) {
    let api = ServiceRecord {
        id: "s-api".to_string(),
        name: "shop_api".to_string(),
        labels: labels(&[(STACK_NAMESPACE_LABEL, "shop"), ("team", "storefront")]),
        image: "registry.local/shop/api:2.4".to_string(),
        replicas: Some(3),
        restart_policy: Some(RestartPolicy {
            condition: "any".to_string(),
            delay_ns: None,
            max_attempts: None,
            window_ns: None,
        }),
        update_config: Some(UpdateConfig {
            parallelism: Some(2),
            delay_ns: Some(10_000_000_000),
            failure_action: Some("rollback".to_string()),
            monitor_ns: Some(15_000_000_000),
            max_failure_ratio: Some(0.25),
        }),
        rollback_config: Some(UpdateConfig {
            parallelism: Some(1),
            ..UpdateConfig::default()
        }),
        constraints: vec![
            "node.role == worker".to_string(),
            "node.labels.zone == us-east".to_string(),
        ],
        limits: Some(ResourceSpec { nano_cpus: 1_500_000_000, memory_bytes: 104_857_600 }),
        reservations: Some(ResourceSpec { nano_cpus: 500_000_000, memory_bytes: 52_428_800 }),
        ports: vec![PortSpec { published: 8080, target: 80 }],
        task_networks: vec![
            NetworkAttachment { target: "n-backend".to_string(), aliases: vec![] },
            NetworkAttachment { target: "n-ingress".to_string(), aliases: vec![] },
        ],
        service_networks: vec![NetworkAttachment {
            target: "n-backend".to_string(),
            aliases: vec!["api".to_string()],
        }],
        container_labels: labels(&[("com.example.build", "1042")]),
        mounts: vec![MountSpec {
            source: "shop_assets".to_string(),
            target: "/srv/assets".to_string(),
        }],
        env: vec!["MODE=production".to_string(), "WORKERS=4".to_string()],
        log_driver: Some(LogDriver {
            name: Some("json-file".to_string()),
            options: BTreeMap::from([("max-size".to_string(), "10m".to_string())]),
        }),
    };

    let worker = ServiceRecord {
        id: "s-worker".to_string(),
        name: "shop_worker".to_string(),
        labels: labels(&[(STACK_NAMESPACE_LABEL, "shop")]),
        image: "registry.local/shop/worker:2.4".to_string(),
        replicas: Some(1),
        restart_policy: None,
        update_config: None,
        rollback_config: None,
        constraints: vec![],
        limits: None,
        reservations: None,
        ports: vec![],
        task_networks: vec![NetworkAttachment { target: "n-backend".to_string(), aliases: vec![] }],
        service_networks: vec![],
        container_labels: BTreeMap::new(),
        mounts: vec![],
        env: vec![],
        log_driver: None,
    };

    let monitoring = ServiceRecord {
        id: "s-mon".to_string(),
        name: "metrics_scraper".to_string(),
        labels: labels(&[(STACK_NAMESPACE_LABEL, "monitoring")]),
        image: "prom/prometheus:v2.48".to_string(),
        replicas: Some(1),
        restart_policy: None,
        update_config: None,
        rollback_config: None,
        constraints: vec![],
        limits: None,
        reservations: None,
        ports: vec![],
        task_networks: vec![],
        service_networks: vec![],
        container_labels: BTreeMap::new(),
        mounts: vec![],
        env: vec![],
        log_driver: None,
    };

    let orphan = ServiceRecord {
        id: "s-orphan".to_string(),
        name: "standalone".to_string(),
        labels: BTreeMap::new(),
        image: "busybox:latest".to_string(),
        replicas: Some(1),
        restart_policy: None,
        update_config: None,
        rollback_config: None,
        constraints: vec![],
        limits: None,
        reservations: None,
        ports: vec![],
        task_networks: vec![],
        service_networks: vec![],
        container_labels: BTreeMap::new(),
        mounts: vec![],
        env: vec![],
        log_driver: None,
    };

    let networks = HashMap::from([
        (
            "n-backend".to_string(),
            NetworkRecord {
                id: "n-backend".to_string(),
                name: "shop_backend".to_string(),
                driver: "overlay".to_string(),
                options: BTreeMap::from([
                    ("mtu".to_string(), "1450".to_string()),
                    ("vxlanid_list".to_string(), "4098".to_string()),
                ]),
                labels: labels(&[(STACK_NAMESPACE_LABEL, "shop")]),
            },
        ),
        (
            "n-ingress".to_string(),
            NetworkRecord {
                id: "n-ingress".to_string(),
                name: "edge-ingress".to_string(),
                driver: "overlay".to_string(),
                options: BTreeMap::new(),
                labels: BTreeMap::new(),
            },
        ),
    ]);

    (vec![api, worker, monitoring, orphan], networks)
}

#[test]
fn renders_selected_stack_to_parseable_yaml() {
    let (services, networks) = snapshot();
    let index = StackIndex::build(services);

    let selected = index.select("shop").unwrap();
    assert_eq!(selected, ["shop"]);

    let doc = render_stack("shop", &index, &networks, &RenderOptions::default()).unwrap();
    let value: serde_yaml::Value = serde_yaml::from_str(&doc).unwrap();

    assert_eq!(value["version"].as_str(), Some("3.3"));

    // Service key comes from the first service-level attachment alias.
    let api = &value["services"]["api"];
    assert_eq!(api["image"].as_str(), Some("registry.local/shop/api:2.4"));
    assert_eq!(api["deploy"]["replicas"].as_u64(), Some(3));
    assert_eq!(api["deploy"]["restart_policy"]["delay"].as_str(), Some("3s"));
    assert_eq!(api["deploy"]["update_config"]["parallelism"].as_u64(), Some(2));
    assert_eq!(api["deploy"]["update_config"]["max_failure_ratio"].as_f64(), Some(0.25));
    assert_eq!(api["deploy"]["rollback_config"]["parallelism"].as_u64(), Some(1));
    assert!(api["deploy"]["rollback_config"]["delay"].is_null());
    assert_eq!(
        api["deploy"]["placement"]["constraints"][1].as_str(),
        Some("node.labels.zone == us-east")
    );
    assert_eq!(api["deploy"]["resources"]["limits"]["cpus"].as_str(), Some("1.50"));
    assert_eq!(api["deploy"]["resources"]["limits"]["memory"].as_str(), Some("100M"));
    assert_eq!(api["ports"][0].as_str(), Some("8080:80"));
    assert_eq!(api["networks"][0].as_str(), Some("shop_backend"));
    assert_eq!(api["networks"][1].as_str(), Some("edge-ingress"));
    assert_eq!(api["logging"]["driver"].as_str(), Some("json-file"));

    let worker = &value["services"]["shop_worker"];
    assert_eq!(worker["deploy"]["replicas"].as_u64(), Some(1));

    // Top-level network block: managed network with filtered options, the
    // ingress as an external reference.
    let backend = &value["networks"]["shop_backend"];
    assert_eq!(backend["driver"].as_str(), Some("overlay"));
    assert_eq!(backend["driver_opts"]["mtu"].as_u64(), Some(1450));
    assert!(backend["driver_opts"]["vxlanid_list"].is_null());
    assert_eq!(value["networks"]["edge-ingress"]["external"].as_bool(), Some(true));
}

#[test]
fn orphan_service_never_appears_in_any_document() {
    let (services, networks) = snapshot();
    let index = StackIndex::build(services);

    for stack in index.select("*").unwrap() {
        let doc = render_stack(stack, &index, &networks, &RenderOptions::default()).unwrap();
        assert!(!doc.contains("standalone"), "orphan leaked into stack {stack}");
    }
}

#[test]
fn documents_for_different_stacks_are_independent() {
    let (services, networks) = snapshot();
    let index = StackIndex::build(services);

    let monitoring =
        render_stack("monitoring", &index, &networks, &RenderOptions::default()).unwrap();
    assert!(monitoring.contains("metrics_scraper"));
    assert!(!monitoring.contains("shop_backend"));

    // Rendering one stack must not bleed state into the next render.
    let shop = render_stack("shop", &index, &networks, &RenderOptions::default()).unwrap();
    let again = render_stack("shop", &index, &networks, &RenderOptions::default()).unwrap();
    assert_eq!(shop, again);
}

#[test]
fn strip_prefix_and_encryption_options_thread_through() {
    let (services, networks) = snapshot();
    let index = StackIndex::build(services);

    let options = RenderOptions { strip_prefix: true, force_encrypted: true };
    let doc = render_stack("shop", &index, &networks, &options).unwrap();
    let value: serde_yaml::Value = serde_yaml::from_str(&doc).unwrap();

    let backend = &value["networks"]["backend"];
    assert_eq!(backend["driver_opts"]["encrypted"].as_str(), Some(""));
    // The unmanaged ingress keeps its raw name.
    assert_eq!(value["networks"]["edge-ingress"]["external"].as_bool(), Some(true));
}
