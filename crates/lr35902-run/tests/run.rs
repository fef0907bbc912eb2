use lr35902_core::{CpuError, Model};
use lr35902_run::{RunConfig, RunError, Runner, StopReason};

fn config() -> RunConfig {
    RunConfig {
        load_address: 0x0100,
        serial_echo: false,
        ..RunConfig::default()
    }
}

#[test]
fn serial_output_is_captured() {
    #[rustfmt::skip]
    let program = [
        0x3E, b'O', // LD A,'O'
        0xE0, 0x01, // LDH (SB),A
        0x3E, 0x81, // LD A,$81
        0xE0, 0x02, // LDH (SC),A
        0x3E, b'K',
        0xE0, 0x01,
        0x3E, 0x81,
        0xE0, 0x02,
        0x76,       // HALT
    ];
    let mut runner = Runner::new(config(), &program);

    let summary = runner.run().unwrap();
    assert_eq!(summary.reason, StopReason::Halted);
    assert_eq!(summary.instructions, 9);
    assert_eq!(runner.bus.output(), b"OK");
}

#[test]
fn instruction_limit_stops_tight_loop() {
    // JR -2
    let mut runner = Runner::new(
        RunConfig {
            max_instructions: 100,
            ..config()
        },
        &[0x18, 0xFE],
    );

    let summary = runner.run().unwrap();
    assert_eq!(summary.reason, StopReason::InstructionLimit);
    assert_eq!(summary.instructions, 100);
    assert_eq!(summary.cycles, 1200);
}

#[test]
fn cycle_limit_is_checked_between_instructions() {
    let mut runner = Runner::new(
        RunConfig {
            max_cycles: Some(50),
            ..config()
        },
        &[0x18, 0xFE],
    );

    let summary = runner.run().unwrap();
    assert_eq!(summary.reason, StopReason::CycleLimit);
    assert_eq!(summary.instructions, 5);
    assert_eq!(summary.cycles, 60);
}

#[test]
fn undefined_opcode_aborts_the_run() {
    let mut runner = Runner::new(config(), &[0x00, 0xDD]);

    match runner.run() {
        Err(RunError::Cpu(CpuError::UnknownOpcode { opcode, pc })) => {
            assert_eq!(opcode, 0xDD);
            assert_eq!(pc, 0x0101);
        }
        other => panic!("expected unknown opcode, got {other:?}"),
    }
}

#[test]
fn serial_interrupt_reaches_handler() {
    let mut image = vec![0u8; 0x010A];
    // Handler: LD B,$2A / RETI
    image[0x0058..0x005B].copy_from_slice(&[0x06, 0x2A, 0xD9]);
    image[0x0100..0x010A].copy_from_slice(&[
        0x3E, 0x08, // LD A,$08
        0xE0, 0xFF, // LDH (IE),A
        0xFB, // EI
        0x3E, 0x81, // LD A,$81
        0xE0, 0x02, // LDH (SC),A
        0x76, // HALT
    ]);
    let mut runner = Runner::new(
        RunConfig {
            load_address: 0x0000,
            ..config()
        },
        &image,
    );

    let summary = runner.run().unwrap();
    assert_eq!(summary.reason, StopReason::Halted);
    assert_eq!(runner.cpu.regs.b, 0x2A);
    assert_eq!(runner.cpu.regs.pc, 0x010A);
    assert!(runner.cpu.ime);
    assert_eq!(runner.bus.output(), &[0x00]);
}

#[test]
fn cgb_run_uses_cgb_boot_state() {
    let mut runner = Runner::new(
        RunConfig {
            model: Model::Cgb,
            ..config()
        },
        &[0x76],
    );
    runner.run().unwrap();
    assert_eq!(runner.cpu.regs.a, 0x11);
}
