// ==========================================
// 码板装车端到端流程测试
// ==========================================
// 测试范围:
// 1. 待码货品 → 装板准备区（勾选同步清理）
// 2. 整个准备区装板，货板状态 available → loading
// 3. 删除货板，货品以完整记录退回待码货品
// 4. 空名称新建货板被拒绝
// 5. 卸车: 货品退回装板准备区，loaded → available
// 6. 装入不存在的货板: 报错且任何池不变
// ==========================================


use pallet_loading::config::EngineConfig;
use pallet_loading::domain::{ItemLocation, PalletStatus, PoolKind};
use pallet_loading::engine::{EngineError, LoadingWorkbench, PoolStore, Scope, TransferOutcome};
use test_helpers::{ids, item, items};

fn workbench_abc() -> LoadingWorkbench {
    pallet_loading::logging::init_test();
    LoadingWorkbench::with_store(
        PoolStore::with_items(items(&["A", "B", "C"])),
        EngineConfig::default(),
    )
}

#[test]
fn test_move_selected_to_preparing() {
    let mut workbench = workbench_abc();
    workbench.set_selection(PoolKind::Waiting, &ids(&["A", "C"]));

    let outcome = workbench.add_to_preparing();

    assert_eq!(
        outcome,
        TransferOutcome::Applied {
            moved: ids(&["A", "C"]),
            pallets: vec![],
        }
    );
    let store = workbench.store();
    assert_eq!(store.waiting_ids(), ids(&["B"]).as_slice());
    let preparing = store.preparing_items();
    assert_eq!(preparing.len(), 2);
    assert_eq!(preparing[0], item("A").to_view());
    assert_eq!(preparing[1], item("C").to_view());
    assert!(workbench.selection().is_empty(PoolKind::Waiting));
}

#[test]
fn test_full_pallet_lifecycle() {
    let mut workbench = workbench_abc();
    workbench.move_to_preparing(&ids(&["A", "C"]));

    // 新建货板并装入整个准备区
    let pallet_id = workbench.create_pallet("P1", None).unwrap();
    assert_eq!(
        workbench.store().pallet(&pallet_id).unwrap().status,
        PalletStatus::Available
    );

    let outcome = workbench
        .load_to_pallet_scoped(&pallet_id, Scope::All)
        .unwrap();
    assert_eq!(outcome.moved(), ids(&["A", "C"]).as_slice());

    let pallet = workbench.store().pallet(&pallet_id).unwrap();
    assert!(workbench.store().preparing_ids().is_empty());
    assert_eq!(pallet.item_ids(), ids(&["A", "C"]).as_slice());
    assert_eq!(pallet.item_count(), 2);
    assert_eq!(pallet.status, PalletStatus::Loading);

    let view = workbench.store().pallet_view(&pallet_id).unwrap();
    assert_eq!(view.item_count, view.items.len());
    assert_eq!(view.items[0], item("A").to_view());

    // 删除货板: 货品以完整记录退回待码货品
    workbench.delete_pallet(&pallet_id).unwrap();
    let store = workbench.store();
    assert!(store.pallets().is_empty());
    assert_eq!(store.waiting_ids(), ids(&["B", "A", "C"]).as_slice());
    let restored: Vec<_> = store.waiting_items().into_iter().cloned().collect();
    assert_eq!(restored, items(&["B", "A", "C"]));
    assert!(!workbench
        .selection()
        .is_selected(PoolKind::Pallets, &pallet_id));
    store.check_invariants().unwrap();
}

#[test]
fn test_create_pallet_with_empty_name_is_rejected() {
    let mut workbench = workbench_abc();
    workbench.create_pallet("P1", None).unwrap();

    let before = workbench.store().pallet_views();
    let result = workbench.create_pallet("", None);
    assert_eq!(result, Err(EngineError::EmptyPalletName));
    let result = workbench.create_pallet("   ", Some("别名"));
    assert_eq!(result, Err(EngineError::EmptyPalletName));

    assert_eq!(workbench.store().pallet_views(), before);
}

#[test]
fn test_unload_loaded_pallet_returns_items_to_preparing() {
    let mut workbench = workbench_abc();
    workbench.move_to_preparing(&ids(&["A", "C"]));
    let pallet_id = workbench.create_pallet("P1", Some("北线")).unwrap();
    workbench
        .load_to_pallet_scoped(&pallet_id, Scope::All)
        .unwrap();
    workbench
        .set_pallet_status(&pallet_id, PalletStatus::Loaded)
        .unwrap();

    let outcome = workbench.unload_pallet(&pallet_id).unwrap();
    assert_eq!(outcome.moved(), ids(&["A", "C"]).as_slice());

    let store = workbench.store();
    let pallet = store.pallet(&pallet_id).unwrap();
    assert!(pallet.item_ids().is_empty());
    assert_eq!(pallet.item_count(), 0);
    assert_eq!(pallet.status, PalletStatus::Available);
    assert_eq!(store.preparing_ids(), ids(&["A", "C"]).as_slice());
    assert_eq!(store.waiting_ids(), ids(&["B"]).as_slice());
    assert_eq!(store.locate("A"), Some(ItemLocation::Preparing));
}

#[test]
fn test_load_into_missing_pallet_changes_nothing() {
    let mut workbench = workbench_abc();
    workbench.move_to_preparing(&ids(&["A"]));
    let pallet_id = workbench.create_pallet("P1", None).unwrap();
    let before_preparing = workbench.store().preparing_ids().to_vec();
    let before_pallets = workbench.store().pallet_views();

    let result = workbench.load_to_pallet_scoped("P-missing", Scope::Selected(ids(&["A"])));

    assert_eq!(result, Err(EngineError::pallet_not_found("P-missing")));
    assert_eq!(workbench.store().preparing_ids(), before_preparing.as_slice());
    assert_eq!(workbench.store().pallet_views(), before_pallets);
    assert!(workbench.store().pallet(&pallet_id).unwrap().is_empty());
}

#[test]
fn test_button_flow_through_vehicle_loading() {
    let mut workbench = workbench_abc();

    // 装入全部待码货品
    workbench.set_selection(PoolKind::Waiting, &ids(&["A", "B", "C"]));
    workbench.add_to_preparing();

    // 新建两个货板，第二个成为唯一勾选
    let first = workbench.create_pallet("P1", None).unwrap();
    let second = workbench.create_pallet("P2", None).unwrap();
    assert_eq!(
        workbench.selection().selected_ids(PoolKind::Pallets),
        vec![second.clone()]
    );

    // 只装勾选的 B
    workbench.set_selection(PoolKind::Preparing, &ids(&["B"]));
    let outcome = workbench.load_to_pallet().unwrap();
    assert_eq!(
        outcome,
        TransferOutcome::Applied {
            moved: ids(&["B"]),
            pallets: vec![second.clone()],
        }
    );

    // 未勾选准备区货品时装入剩余全部
    workbench.set_selection(PoolKind::Pallets, &[first.clone()]);
    workbench.load_to_pallet().unwrap();
    assert_eq!(
        workbench.store().pallet(&first).unwrap().item_ids(),
        ids(&["A", "C"]).as_slice()
    );

    // 装车 → 确认装车 → 确认卸车
    workbench.set_selection(PoolKind::Pallets, &[first.clone(), second.clone()]);
    workbench.start_selected_loading().unwrap();
    workbench.load_selected_to_vehicle().unwrap();
    assert_eq!(
        workbench.store().pallets_with_status(PalletStatus::Loaded).len(),
        2
    );

    let outcome = workbench.unload_selected_pallets().unwrap();
    assert_eq!(outcome.moved().len(), 3);
    let summary = workbench.store().summary();
    assert_eq!(summary.preparing_count, 3);
    assert_eq!(summary.palletized_count, 0);
    assert_eq!(summary.status_counts.get(&PalletStatus::Available), Some(&2));
    assert!(summary.is_balanced());
}
