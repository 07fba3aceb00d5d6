//! End-to-end boot probe: a ZZ machine description installed as the
//! ambient device tree, probed through the platform registry, comes out
//! with the OpenCAPI topology patched in.

use dt::{DeviceTree, Property};

fn zz_factory_tree() -> DeviceTree {
    let mut tree = DeviceTree::new("");
    tree.node_mut(tree.root_id)
        .set_property(Property::from_str("compatible", "ibm,zz-2s2u"));

    let npu = tree.new_child(tree.root_id, "npu@5011000");
    let node = tree.node_mut(npu);
    node.set_property(Property::from_str("compatible", "ibm,power9-npu"));
    node.set_property(Property::from_cells("ibm,npu-links", &[0]));

    let xscom = tree.new_child(tree.root_id, "xscom@603fc00000000");
    tree.node_mut(xscom)
        .set_property(Property::from_str("compatible", "ibm,xscom"));

    tree
}

#[test]
fn zz_machine_boots_with_patched_topology() {
    pal::devtree::init(zz_factory_tree());

    let platform = pal::probe_platform().expect("a ZZ tree should be claimed");
    assert_eq!(platform.name, "ZZ");
    assert!(platform.ocapi.is_some());
    assert!(platform.pci_setup_phb.is_none());

    pal::devtree::with(|tree| {
        let npu = tree.get_node("/npu@5011000").unwrap();
        assert_eq!(
            npu.get_property("ibm,npu-links").unwrap().value_as_u32(),
            Ok(2)
        );
        assert_eq!(npu.children.len(), 2);

        let link2 = tree.get_node("/npu@5011000/link@2").unwrap();
        let link3 = tree.get_node("/npu@5011000/link@3").unwrap();
        let mask2 = link2
            .get_property("ibm,npu-lane-mask")
            .unwrap()
            .value_as_u32()
            .unwrap();
        let mask3 = link3
            .get_property("ibm,npu-lane-mask")
            .unwrap()
            .value_as_u32()
            .unwrap();
        assert_ne!(mask2, mask3);
        assert_eq!(
            link2.get_property("ibm,link-speed").unwrap().value_as_u64(),
            Ok(20_000_000_000)
        );

        let xscom = tree.get_node("/xscom@603fc00000000").unwrap();
        assert_eq!(xscom.children.len(), 1);
        let i2cm = tree.get_node("/xscom@603fc00000000/i2cm@a1000").unwrap();
        assert_eq!(
            i2cm.get_property("reg").unwrap().value_as_cells(),
            Ok(vec![0xa1000, 0x1000])
        );
        assert_eq!(i2cm.children.len(), 1);
        let bus = tree
            .get_node("/xscom@603fc00000000/i2cm@a1000/i2c-bus@4")
            .unwrap();
        assert_eq!(bus.get_property("reg").unwrap().value_as_u32(), Ok(4));
        assert_eq!(
            bus.get_property("bus-frequency").unwrap().value_as_u32(),
            Ok(0x61a80)
        );
        assert!(bus.is_compatible("ibm,power8-i2c-port"));
    });

    // a reprobe over the already-patched tree must not duplicate the bus
    let nodes_before = pal::devtree::with(|tree| tree.len());
    let platform = pal::probe_platform().expect("reprobe should still claim the machine");
    assert_eq!(platform.name, "ZZ");
    pal::devtree::with(|tree| {
        let xscom = tree.get_node("/xscom@603fc00000000").unwrap();
        assert_eq!(xscom.children.len(), 1);
        let i2cm = tree.get_node("/xscom@603fc00000000/i2cm@a1000").unwrap();
        assert_eq!(i2cm.children.len(), 1);
        // only the NPU links grew, the corrector rebuilds them each pass
        assert_eq!(tree.len(), nodes_before + 2);
    });
}
