use super::{PoolStore, Scope};
use crate::domain::item::ShipmentItem;
use crate::domain::types::{ItemLocation, PalletStatus, PoolKind};
use crate::engine::error::EngineError;
use crate::engine::lifecycle::TransitionPolicy;
use chrono::NaiveDate;

// ==========================================
// 测试辅助函数
// ==========================================

fn item(id: &str) -> ShipmentItem {
    ShipmentItem {
        id: id.to_string(),
        external_order_id: format!("EXT-{}", id),
        product_name: format!("货品{}", id),
        customer: "华东客户".to_string(),
        product_strategy: "普通".to_string(),
        warehouse_area: "B-01".to_string(),
        arrival_date: NaiveDate::from_ymd_opt(2026, 5, 1),
        quantity: 3,
        weight_kg: Some(12.5),
        volume_m3: Some(0.4),
        remark: Some(format!("备注{}", id)),
    }
}

fn ids(raw: &[&str]) -> Vec<String> {
    raw.iter().map(|s| s.to_string()).collect()
}

fn store_abc() -> PoolStore {
    PoolStore::with_items(vec![item("A"), item("B"), item("C")])
}

// ==========================================
// 接入
// ==========================================

#[test]
fn test_seed_skips_registered_ids() {
    let mut store = store_abc();
    let accepted = store.seed_waiting(vec![item("A"), item("D"), item("D")]);
    assert_eq!(accepted, 1);
    assert_eq!(store.waiting_ids(), ids(&["A", "B", "C", "D"]).as_slice());
    assert!(store.check_invariants().is_ok());
}

// ==========================================
// 待码货品 ⇄ 装板准备区
// ==========================================

#[test]
fn test_move_to_preparing_keeps_pool_order() {
    let mut store = store_abc();
    let moved = store.move_to_preparing(&ids(&["C", "A"]));
    assert_eq!(moved, ids(&["A", "C"]));
    assert_eq!(store.waiting_ids(), ids(&["B"]).as_slice());

    let preparing = store.preparing_items();
    assert_eq!(preparing.len(), 2);
    assert_eq!(preparing[0].id, "A");
    assert_eq!(preparing[1].external_order_id, "EXT-C");
}

#[test]
fn test_move_ignores_unknown_and_duplicate_ids() {
    let mut store = store_abc();
    let moved = store.move_to_preparing(&ids(&["A", "A", "ZZZ"]));
    assert_eq!(moved, ids(&["A"]));

    // 已在准备区的货品再次装入不生效
    let moved = store.move_to_preparing(&ids(&["A"]));
    assert!(moved.is_empty());
    assert!(store.check_invariants().is_ok());
}

#[test]
fn test_empty_move_is_noop() {
    let mut store = store_abc();
    let before = store.clone();
    assert!(store.move_to_preparing(&[]).is_empty());
    assert!(store.move_to_waiting(&[]).is_empty());
    assert_eq!(store.waiting_ids(), before.waiting_ids());
    assert_eq!(store.preparing_ids(), before.preparing_ids());
}

#[test]
fn test_round_trip_restores_full_records() {
    let mut store = store_abc();
    let original: Vec<ShipmentItem> = store.waiting_items().into_iter().cloned().collect();

    store.move_to_preparing(&ids(&["A", "B", "C"]));
    store.move_to_waiting(&ids(&["A", "B", "C"]));

    let restored: Vec<ShipmentItem> = store.waiting_items().into_iter().cloned().collect();
    assert_eq!(restored, original);
    assert_eq!(restored[0].remark.as_deref(), Some("备注A"));
}

// ==========================================
// 装板
// ==========================================

#[test]
fn test_load_all_advances_available_to_loading() {
    let mut store = store_abc();
    store.move_to_preparing(&ids(&["A", "C"]));
    let pallet_id = store.create_pallet("一号板", None).unwrap();

    let report = store.load_to_pallet(&pallet_id, &Scope::All).unwrap();
    assert_eq!(report.moved, ids(&["A", "C"]));
    assert_eq!(report.status_before, PalletStatus::Available);
    assert_eq!(report.status_after, PalletStatus::Loading);

    let pallet = store.pallet(&pallet_id).unwrap();
    assert_eq!(pallet.item_count(), 2);
    assert!(store.preparing_ids().is_empty());
}

#[test]
fn test_load_selected_subset_only() {
    let mut store = store_abc();
    store.move_to_preparing(&ids(&["A", "B", "C"]));
    let pallet_id = store.create_pallet("P", None).unwrap();

    let report = store
        .load_to_pallet(&pallet_id, &Scope::Selected(ids(&["B"])))
        .unwrap();
    assert_eq!(report.moved, ids(&["B"]));
    assert_eq!(store.preparing_ids(), ids(&["A", "C"]).as_slice());
    assert_eq!(
        store.locate("B"),
        Some(ItemLocation::Pallet(pallet_id.clone()))
    );
}

#[test]
fn test_load_does_not_change_non_available_status() {
    let mut store = store_abc();
    let pallet_id = store.create_pallet("P", None).unwrap();
    store
        .set_pallet_status(&pallet_id, PalletStatus::Loaded, TransitionPolicy::Permissive)
        .unwrap();
    store.move_to_preparing(&ids(&["A"]));

    let report = store.load_to_pallet(&pallet_id, &Scope::All).unwrap();
    assert_eq!(report.status_after, PalletStatus::Loaded);
}

#[test]
fn test_load_with_empty_preparing_is_noop() {
    let mut store = store_abc();
    let pallet_id = store.create_pallet("P", None).unwrap();

    let report = store.load_to_pallet(&pallet_id, &Scope::All).unwrap();
    assert!(report.moved.is_empty());
    assert_eq!(store.pallet(&pallet_id).unwrap().status, PalletStatus::Available);
    assert_eq!(store.waiting_ids().len(), 3);
}

#[test]
fn test_load_to_missing_pallet_changes_nothing() {
    let mut store = store_abc();
    store.move_to_preparing(&ids(&["A"]));

    let err = store
        .load_to_pallet("P-missing", &Scope::Selected(ids(&["A"])))
        .unwrap_err();
    assert_eq!(
        err,
        EngineError::PalletNotFound {
            pallet_id: "P-missing".to_string()
        }
    );
    assert_eq!(store.preparing_ids(), ids(&["A"]).as_slice());
}

// ==========================================
// 卸车 / 删除
// ==========================================

#[test]
fn test_unload_returns_items_to_preparing() {
    let mut store = store_abc();
    store.move_to_preparing(&ids(&["A", "C"]));
    let pallet_id = store.create_pallet("P", None).unwrap();
    store.load_to_pallet(&pallet_id, &Scope::All).unwrap();
    store
        .set_pallet_status(&pallet_id, PalletStatus::Loaded, TransitionPolicy::Permissive)
        .unwrap();

    let released = store
        .unload_pallet(&pallet_id, TransitionPolicy::Permissive)
        .unwrap();
    assert_eq!(released, ids(&["A", "C"]));

    let pallet = store.pallet(&pallet_id).unwrap();
    assert_eq!(pallet.item_count(), 0);
    assert_eq!(pallet.status, PalletStatus::Available);
    assert_eq!(store.preparing_ids(), ids(&["A", "C"]).as_slice());
    assert_eq!(store.waiting_ids(), ids(&["B"]).as_slice());
}

#[test]
fn test_strict_unload_of_shipping_pallet_changes_nothing() {
    let mut store = store_abc();
    store.move_to_preparing(&ids(&["A"]));
    let pallet_id = store.create_pallet("P", None).unwrap();
    store.load_to_pallet(&pallet_id, &Scope::All).unwrap();
    store
        .set_pallet_status(&pallet_id, PalletStatus::Shipping, TransitionPolicy::Permissive)
        .unwrap();

    let result = store.unload_pallet(&pallet_id, TransitionPolicy::Strict);
    assert_eq!(
        result,
        Err(EngineError::IllegalTransition {
            from: PalletStatus::Shipping,
            to: PalletStatus::Available,
        })
    );

    let pallet = store.pallet(&pallet_id).unwrap();
    assert_eq!(pallet.status, PalletStatus::Shipping);
    assert_eq!(pallet.item_ids(), ids(&["A"]).as_slice());
    assert!(store.preparing_ids().is_empty());

    // 已装车货板在严格模式下可以卸车
    store
        .set_pallet_status(&pallet_id, PalletStatus::Loaded, TransitionPolicy::Permissive)
        .unwrap();
    let released = store
        .unload_pallet(&pallet_id, TransitionPolicy::Strict)
        .unwrap();
    assert_eq!(released, ids(&["A"]));
    assert_eq!(store.pallet(&pallet_id).unwrap().status, PalletStatus::Available);
}

#[test]
fn test_delete_cascades_to_waiting() {
    let mut store = store_abc();
    store.move_to_preparing(&ids(&["A", "C"]));
    let pallet_id = store.create_pallet("P", None).unwrap();
    store.load_to_pallet(&pallet_id, &Scope::All).unwrap();

    let released = store.delete_pallet(&pallet_id).unwrap();
    assert_eq!(released, ids(&["A", "C"]));
    assert!(store.pallet(&pallet_id).is_none());
    assert_eq!(store.waiting_ids(), ids(&["B", "A", "C"]).as_slice());

    let restored = store.item("A").unwrap();
    assert_eq!(restored.weight_kg, Some(12.5));
}

#[test]
fn test_unload_and_delete_unknown_pallet() {
    let mut store = store_abc();
    assert!(matches!(
        store.unload_pallet("nope", TransitionPolicy::Permissive),
        Err(EngineError::PalletNotFound { .. })
    ));
    assert!(matches!(
        store.delete_pallet("nope"),
        Err(EngineError::PalletNotFound { .. })
    ));
}

// ==========================================
// 货板维护
// ==========================================

#[test]
fn test_create_pallet_rejects_blank_name() {
    let mut store = store_abc();
    assert_eq!(store.create_pallet("", None), Err(EngineError::EmptyPalletName));
    assert_eq!(store.create_pallet("   ", Some("x")), Err(EngineError::EmptyPalletName));
    assert!(store.pallets().is_empty());
}

#[test]
fn test_create_pallet_trims_name_and_alias() {
    let mut store = store_abc();
    let pallet_id = store.create_pallet("  二号板 ", Some("  ")).unwrap();
    let pallet = store.pallet(&pallet_id).unwrap();
    assert_eq!(pallet.name, "二号板");
    assert_eq!(pallet.alias, None);
}

#[test]
fn test_set_status_strict_policy_rejects_without_change() {
    let mut store = store_abc();
    let pallet_id = store.create_pallet("P", None).unwrap();

    let err = store
        .set_pallet_status(&pallet_id, PalletStatus::Unloading, TransitionPolicy::Strict)
        .unwrap_err();
    assert!(matches!(err, EngineError::IllegalTransition { .. }));
    assert_eq!(store.pallet(&pallet_id).unwrap().status, PalletStatus::Available);

    let previous = store
        .set_pallet_status(&pallet_id, PalletStatus::Loading, TransitionPolicy::Strict)
        .unwrap();
    assert_eq!(previous, PalletStatus::Available);
}

#[test]
fn test_stage_pallet_contents_swaps_preparing() {
    let mut store = store_abc();
    store.move_to_preparing(&ids(&["A"]));
    let pallet_id = store.create_pallet("P", None).unwrap();
    store.load_to_pallet(&pallet_id, &Scope::All).unwrap();
    store.move_to_preparing(&ids(&["B"]));

    let report = store.stage_pallet_contents(&pallet_id).unwrap();
    assert_eq!(report.returned_to_waiting, ids(&["B"]));
    assert_eq!(report.staged, ids(&["A"]));
    assert_eq!(store.preparing_ids(), ids(&["A"]).as_slice());
    assert_eq!(store.waiting_ids(), ids(&["C", "B"]).as_slice());
    assert!(store.pallet(&pallet_id).unwrap().is_empty());
}

// ==========================================
// 查询 / 校验
// ==========================================

#[test]
fn test_summary_and_views() {
    let mut store = store_abc();
    store.move_to_preparing(&ids(&["A", "B"]));
    let p1 = store.create_pallet("P1", None).unwrap();
    store.create_pallet("P2", None).unwrap();
    store.load_to_pallet(&p1, &Scope::Selected(ids(&["A"]))).unwrap();

    let summary = store.summary();
    assert_eq!(summary.registered_count, 3);
    assert_eq!(summary.waiting_count, 1);
    assert_eq!(summary.preparing_count, 1);
    assert_eq!(summary.palletized_count, 1);
    assert_eq!(summary.pallet_count, 2);
    assert_eq!(summary.status_counts.get(&PalletStatus::Loading), Some(&1));
    assert_eq!(summary.status_counts.get(&PalletStatus::Available), Some(&1));
    assert!(summary.is_balanced());

    let view = store.pallet_view(&p1).unwrap();
    assert_eq!(view.item_count, view.items.len());
    assert_eq!(view.status_label, "装车中");
    assert_eq!(store.pallet_views().len(), 2);
    assert_eq!(store.pallets_with_status(PalletStatus::Loading).len(), 1);
}

#[test]
fn test_contains_and_pool_ids() {
    let mut store = store_abc();
    let p1 = store.create_pallet("P1", None).unwrap();
    assert!(store.contains(PoolKind::Waiting, "A"));
    assert!(!store.contains(PoolKind::Preparing, "A"));
    assert!(store.contains(PoolKind::Pallets, &p1));
    assert_eq!(store.pool_ids(PoolKind::Pallets), vec![p1.clone()]);
    assert_eq!(store.first_pallet_id(), Some(p1.as_str()));
    assert_eq!(store.locate("missing"), None);
}
