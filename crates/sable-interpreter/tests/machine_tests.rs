//! Machine-level tests
//!
//! Test categories:
//! 1. Evaluation loop: falling off the end, stepping, invalid opcodes
//! 2. Gas metering scenarios
//! 3. Jump validation
//! 4. Host traps and handler rejection
//! 5. Return data and refunds

use sable_interpreter::{
    Config, ExitError, ExitFatal, ExitReason, ExitSuccess, Gas, InterpreterHandler, Machine, MachineStatus,
    NoopHandler, Opcode, Stack, U256,
};

// =============================================================================
// Test Helpers
// =============================================================================

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Creates a machine with empty call data
fn machine(code: &[u8], gas_limit: u64) -> Machine<NoopHandler> {
    init_tracing();
    Machine::new(Vec::new(), code.to_vec(), gas_limit, NoopHandler)
}

fn u(n: u64) -> U256 {
    U256::from(n)
}

fn stop() -> MachineStatus {
    MachineStatus::Exit(ExitReason::Success(ExitSuccess::Stop))
}

fn error(e: ExitError) -> MachineStatus {
    MachineStatus::Exit(ExitReason::Error(e))
}

/// Handler that records what it saw and can charge or reject
#[derive(Default)]
struct RecordingHandler {
    seen: Vec<(Opcode, usize, usize)>,
    charge: u64,
    reject: Option<ExitError>,
}

impl InterpreterHandler for RecordingHandler {
    fn before_opcode_execution(
        &mut self,
        opcode: Opcode,
        pc: usize,
        stack: &Stack,
        gas: &mut Gas,
    ) -> Result<(), ExitError> {
        self.seen.push((opcode, pc, stack.len()));
        if let Some(e) = self.reject {
            return Err(e);
        }
        if !gas.record_cost(self.charge) {
            return Err(ExitError::OutOfGas);
        }
        Ok(())
    }
}

/// Host-side handler that checks LOG operands and records topic counts
#[derive(Default)]
struct LogHandler {
    topic_counts: Vec<usize>,
}

impl InterpreterHandler for LogHandler {
    fn before_opcode_execution(
        &mut self,
        opcode: Opcode,
        _pc: usize,
        stack: &Stack,
        _gas: &mut Gas,
    ) -> Result<(), ExitError> {
        let topics = opcode.log_topics();
        stack.require(2 + topics)?;
        self.topic_counts.push(topics);
        Ok(())
    }
}

// =============================================================================
// 1. Evaluation Loop
// =============================================================================

mod eval_loop {
    use super::*;

    #[test]
    fn test_fully_consumed_code_stops() {
        // PUSH1 0x01
        let mut m = machine(&[0x60, 0x01], 100);
        assert_eq!(m.eval_loop(), stop());
        assert_eq!(m.pc(), 2);
        assert_eq!(m.stack().data(), &[u(1)]);
    }

    #[test]
    fn test_explicit_stop() {
        // STOP PUSH1 0x01
        let mut m = machine(&[0x00, 0x60, 0x01], 100);
        assert_eq!(m.eval_loop(), stop());
        assert_eq!(m.pc(), 0);
        assert!(m.stack().is_empty());
    }

    #[test]
    fn test_truncated_push_runs_off_end() {
        // PUSH2 0xab (missing second byte)
        let mut m = machine(&[0x61, 0xab], 100);
        assert_eq!(m.step(), MachineStatus::Continue(3));
        assert_eq!(m.pc(), 3);
        assert_eq!(m.step(), stop());
        assert_eq!(m.stack().peek(0).unwrap(), u(0xab00));
    }

    #[test]
    fn test_unknown_byte() {
        let mut m = machine(&[0x0c], 100);
        assert_eq!(m.eval_loop(), error(ExitError::InvalidOpcode(0x0c)));
        assert_eq!(m.gas().remaining(), 100);
    }

    #[test]
    fn test_designated_invalid() {
        let mut m = machine(&[0xfe], 100);
        assert_eq!(m.eval_loop(), error(ExitError::DesignatedInvalid));
    }

    #[test]
    fn test_eof_opcode_is_invalid_in_legacy_code() {
        for byte in [0xd0, 0xe0, 0xe6, 0xee, 0xf7, 0xf8] {
            let mut m = machine(&[byte], 100);
            assert_eq!(m.eval_loop(), error(ExitError::InvalidOpcode(byte)));
        }
    }

    #[test]
    fn test_status_is_recorded() {
        let mut m = machine(&[0x5f], 100);
        assert_eq!(m.status(), &MachineStatus::NotStarted);
        m.step();
        assert_eq!(m.status(), &MachineStatus::Continue(1));
        m.step();
        assert_eq!(m.status(), &stop());
    }
}

// =============================================================================
// 2. Gas Metering Scenarios
// =============================================================================

mod gas_metering {
    use super::*;

    #[test]
    fn test_add_one_plus_two() {
        let mut m = machine(&[Opcode::ADD.as_u8()], 10);
        m.stack_mut().push(u(1)).unwrap();
        m.stack_mut().push(u(2)).unwrap();

        assert_eq!(m.eval_loop(), stop());
        assert_eq!(m.stack().peek(0).unwrap(), u(3));
        assert_eq!(m.stack().len(), 1);
        assert_eq!(m.gas().remaining(), 7);
    }

    #[test]
    fn test_add_missing_operand_still_charges() {
        let mut m = machine(&[Opcode::ADD.as_u8()], 10);
        m.stack_mut().push(u(1)).unwrap();

        assert_eq!(m.eval_loop(), error(ExitError::StackUnderflow));
        assert_eq!(m.gas().remaining(), 7);
        assert_eq!(m.stack().len(), 1);
    }

    #[test]
    fn test_add_out_of_gas_leaves_stack() {
        let mut m = machine(&[Opcode::ADD.as_u8()], 2);
        m.stack_mut().push(u(1)).unwrap();
        m.stack_mut().push(u(2)).unwrap();

        assert_eq!(m.eval_loop(), error(ExitError::OutOfGas));
        assert_eq!(m.stack().len(), 2);
        assert_eq!(m.gas().remaining(), 2);
    }

    #[test]
    fn test_add_max_values_wraps() {
        let value = U256::from_limbs([u64::MAX - 1; 4]);
        let mut m = machine(&[Opcode::ADD.as_u8()], 10);
        m.stack_mut().push(value).unwrap();
        m.stack_mut().push(value).unwrap();

        assert_eq!(m.eval_loop(), stop());
        assert_eq!(
            m.stack().peek(0).unwrap(),
            U256::from_limbs([u64::MAX - 3, u64::MAX - 2, u64::MAX - 2, u64::MAX - 2])
        );
    }

    #[test]
    fn test_codesize_four_times() {
        let mut m = machine(&[Opcode::CODESIZE.as_u8(); 4], 10);
        assert_eq!(m.eval_loop(), stop());
        assert_eq!(m.stack().data(), &[u(4), u(4), u(4), u(4)]);
        assert_eq!(m.gas().remaining(), 2);
    }

    #[test]
    fn test_codesize_out_of_gas() {
        let mut m = machine(&[Opcode::CODESIZE.as_u8()], 1);
        assert_eq!(m.eval_loop(), error(ExitError::OutOfGas));
        assert!(m.stack().is_empty());
        assert_eq!(m.gas().remaining(), 1);
    }

    #[test]
    fn test_codesize_full_stack() {
        let mut m = machine(&[Opcode::CODESIZE.as_u8()], 10);
        for i in 0..m.stack().limit() as u64 {
            m.stack_mut().push(u(i)).unwrap();
        }
        assert_eq!(m.eval_loop(), error(ExitError::StackOverflow));
        assert_eq!(m.stack().len(), 1024);
        assert_eq!(m.gas().remaining(), 8);
    }

    #[test]
    fn test_mstore_then_mload() {
        let value = U256::from_limbs([0x1111, 0x2222, 0x3333, 0x4444]);
        let mut code = vec![0x7f];
        code.extend_from_slice(&value.to_big_endian());
        // PUSH1 0 MSTORE PUSH1 0 MLOAD
        code.extend_from_slice(&[0x60, 0x00, 0x52, 0x60, 0x00, 0x51]);

        let mut m = machine(&code, 100);
        assert_eq!(m.eval_loop(), stop());
        assert_eq!(m.stack().data(), &[value]);
        assert_eq!(m.memory().len(), 32);
        // 3 pushes, MSTORE + one word of memory, MLOAD with no expansion
        assert_eq!(m.gas().spent(), 3 + 3 + (3 + 3) + 3 + 3);
    }

    #[test]
    fn test_int_overflow_after_static_charge() {
        // PUSH32 MAX MLOAD
        let mut code = vec![0x7f];
        code.extend_from_slice(&[0xff; 32]);
        code.push(0x51);

        let mut m = machine(&code, 100);
        assert_eq!(m.eval_loop(), error(ExitError::IntOverflow));
        assert_eq!(m.gas().spent(), 6);
        assert_eq!(m.stack().len(), 1);
    }

    #[test]
    fn test_memory_expansion_out_of_gas() {
        // PUSH3 0x100000 MLOAD: far more memory than 100 gas can pay for
        let mut m = machine(&[0x62, 0x10, 0x00, 0x00, 0x51], 100);
        assert_eq!(m.eval_loop(), error(ExitError::OutOfGas));
        assert!(m.memory().is_empty());
        assert_eq!(m.gas().remaining(), 94);
    }
}

// =============================================================================
// 3. Jump Validation
// =============================================================================

mod jumps {
    use super::*;

    #[test]
    fn test_jump_to_jumpdest() {
        // PUSH1 4 JUMP STOP JUMPDEST PUSH1 1
        let mut m = machine(&[0x60, 0x04, 0x56, 0x00, 0x5b, 0x60, 0x01], 100);
        assert_eq!(m.eval_loop(), stop());
        assert_eq!(m.stack().data(), &[u(1)]);
        assert_eq!(m.gas().spent(), 3 + 8 + 1 + 3);
    }

    #[test]
    fn test_jump_into_push_data() {
        // PUSH1 4 JUMP PUSH1 0x5b: byte 4 is 0x5b but it is push data
        let mut m = machine(&[0x60, 0x04, 0x56, 0x60, 0x5b], 100);
        assert_eq!(m.eval_loop(), error(ExitError::InvalidJump));
        assert!(!m.valids().is_valid(4));
    }

    #[test]
    fn test_jump_to_non_jumpdest() {
        // PUSH1 3 JUMP STOP
        let mut m = machine(&[0x60, 0x03, 0x56, 0x00], 100);
        assert_eq!(m.eval_loop(), error(ExitError::InvalidJump));
    }

    #[test]
    fn test_jump_past_code() {
        let mut m = machine(&[0x60, 0x40, 0x56], 100);
        assert_eq!(m.eval_loop(), error(ExitError::InvalidJump));
    }

    #[test]
    fn test_jump_target_overflow() {
        let mut code = vec![0x7f];
        code.extend_from_slice(&[0xff; 32]);
        code.push(0x56);
        let mut m = machine(&code, 100);
        assert_eq!(m.eval_loop(), error(ExitError::IntOverflow));
        assert_eq!(m.gas().spent(), 3 + 8);
    }

    #[test]
    fn test_jumpi_taken() {
        // PUSH1 1 PUSH1 6 JUMPI STOP JUMPDEST PUSH1 7
        let mut m = machine(&[0x60, 0x01, 0x60, 0x06, 0x57, 0x00, 0x5b, 0x60, 0x07], 100);
        assert_eq!(m.step(), MachineStatus::Continue(2));
        assert_eq!(m.step(), MachineStatus::Continue(2));
        assert_eq!(m.step(), MachineStatus::Jump(6));
        assert_eq!(m.eval_loop(), stop());
        assert_eq!(m.stack().data(), &[u(7)]);
    }

    #[test]
    fn test_jumpi_zero_condition_ignores_target() {
        // PUSH1 0 PUSH32 MAX JUMPI PUSH1 7
        let mut code = vec![0x60, 0x00, 0x7f];
        code.extend_from_slice(&[0xff; 32]);
        code.extend_from_slice(&[0x57, 0x60, 0x07]);
        let mut m = machine(&code, 100);
        assert_eq!(m.eval_loop(), stop());
        assert_eq!(m.stack().data(), &[u(7)]);
    }

    #[test]
    fn test_jumpi_to_invalid_target() {
        // PUSH1 1 PUSH1 0 JUMPI
        let mut m = machine(&[0x60, 0x01, 0x60, 0x00, 0x57], 100);
        assert_eq!(m.eval_loop(), error(ExitError::InvalidJump));
    }

    #[test]
    fn test_loop_until_out_of_gas() {
        // JUMPDEST PUSH1 0 JUMP
        let mut m = machine(&[0x5b, 0x60, 0x00, 0x56], 100);
        assert_eq!(m.eval_loop(), error(ExitError::OutOfGas));
        assert!(m.gas().remaining() < 12);
    }
}

// =============================================================================
// 4. Host Traps
// =============================================================================

mod traps {
    use super::*;

    #[test]
    fn test_sload_traps_and_resumes() {
        // PUSH1 5 SLOAD PUSH1 1 ADD
        let code = [0x60, 0x05, 0x54, 0x60, 0x01, 0x01];
        let mut m = Machine::new(Vec::new(), code.to_vec(), 100, RecordingHandler::default());

        assert_eq!(m.eval_loop(), MachineStatus::Trap(Opcode::SLOAD));
        assert_eq!(m.pc(), 2);
        assert_eq!(m.handler().seen, vec![(Opcode::SLOAD, 2, 1)]);

        // Host performs the load
        let key = m.stack_mut().pop().unwrap();
        assert_eq!(key, u(5));
        m.stack_mut().push(u(41)).unwrap();

        assert_eq!(m.resume_after_trap(), stop());
        assert_eq!(m.stack().data(), &[u(42)]);
    }

    #[test]
    fn test_trap_is_sticky_until_resumed() {
        let mut m = machine(&[Opcode::CALLER.as_u8()], 100);
        assert_eq!(m.eval_loop(), MachineStatus::Trap(Opcode::CALLER));
        assert_eq!(m.step(), MachineStatus::Trap(Opcode::CALLER));
        assert_eq!(m.eval_loop(), MachineStatus::Trap(Opcode::CALLER));
        assert_eq!(m.pc(), 0);
        // CALLER has a fixed base cost charged by the machine
        assert_eq!(m.gas().spent(), 2);
    }

    #[test]
    fn test_handler_rejection_exits() {
        let handler = RecordingHandler {
            reject: Some(ExitError::CallTooDeep),
            ..Default::default()
        };
        let mut m = Machine::new(Vec::new(), vec![Opcode::CALL.as_u8()], 100, handler);
        assert_eq!(m.eval_loop(), error(ExitError::CallTooDeep));
        assert_eq!(m.handler().seen.len(), 1);
        assert_eq!(m.resume_after_trap(), error(ExitError::CallTooDeep));
    }

    #[test]
    fn test_handler_charges_gas() {
        let handler = RecordingHandler {
            charge: 2100,
            ..Default::default()
        };
        let mut m = Machine::new(Vec::new(), vec![0x60, 0x00, 0x54], 3000, handler);
        assert_eq!(m.eval_loop(), MachineStatus::Trap(Opcode::SLOAD));
        assert_eq!(m.gas().remaining(), 3000 - 3 - 2100);
    }

    #[test]
    fn test_handler_out_of_gas() {
        let handler = RecordingHandler {
            charge: 2100,
            ..Default::default()
        };
        let mut m = Machine::new(Vec::new(), vec![Opcode::SLOAD.as_u8()], 100, handler);
        assert_eq!(m.eval_loop(), error(ExitError::OutOfGas));
        assert_eq!(m.gas().remaining(), 100);
    }

    #[test]
    fn test_host_exit_after_trap() {
        let mut m = machine(&[Opcode::SSTORE.as_u8()], 100);
        assert_eq!(m.eval_loop(), MachineStatus::Trap(Opcode::SSTORE));
        m.exit(ExitFatal::Other("backend unavailable".to_string()).into());
        assert!(m.status().exit_reason().is_some_and(|r| r.is_error()));
        assert_eq!(
            m.resume_after_trap(),
            MachineStatus::Exit(ExitReason::Fatal(ExitFatal::Other(
                "backend unavailable".to_string()
            )))
        );
    }

    #[test]
    fn test_host_collects_logs() {
        // PUSH1 0xbb PUSH1 0xaa PUSH1 0 PUSH1 0 LOG2 PUSH1 0 PUSH1 0 LOG0
        let code = [
            0x60, 0xbb, 0x60, 0xaa, 0x60, 0x00, 0x60, 0x00, 0xa2, // LOG2
            0x60, 0x00, 0x60, 0x00, 0xa0, // LOG0
        ];
        let mut m = Machine::new(Vec::new(), code.to_vec(), 1000, LogHandler::default());

        let mut status = m.eval_loop();
        while let MachineStatus::Trap(opcode) = status {
            // offset, size, then one word per topic
            for _ in 0..2 + opcode.log_topics() {
                m.stack_mut().pop().unwrap();
            }
            status = m.resume_after_trap();
        }

        assert_eq!(status, stop());
        assert!(m.stack().is_empty());
        assert_eq!(std::mem::take(&mut m.handler_mut().topic_counts), vec![2, 0]);
        assert!(m.handler().topic_counts.is_empty());
    }

    #[test]
    fn test_host_rejects_short_log() {
        // PUSH1 0 PUSH1 0 LOG1: missing the topic word
        let mut m = Machine::new(
            Vec::new(),
            vec![0x60, 0x00, 0x60, 0x00, 0xa1],
            1000,
            LogHandler::default(),
        );
        assert_eq!(m.eval_loop(), error(ExitError::StackUnderflow));
        assert!(m.handler().topic_counts.is_empty());
        assert_eq!(m.stack().len(), 2);
    }

    #[test]
    fn test_failed_nested_call_consumes_child_limit() {
        let child_limit = 50;
        let mut parent = machine(&[Opcode::CALL.as_u8()], 1000);
        assert_eq!(parent.eval_loop(), MachineStatus::Trap(Opcode::CALL));

        // JUMPDEST PUSH0 JUMP: loops until the child runs dry
        let mut child = machine(&[0x5b, 0x5f, 0x56], child_limit);
        let child_status = child.eval_loop();
        assert_eq!(child_status, error(ExitError::OutOfGas));
        assert!(child.gas().remaining() > 0);

        // A failed child forfeits its whole limit
        let child_gas = if child_status.exit_reason().is_some_and(|r| r.is_error()) {
            Gas::without_remaining(child_limit)
        } else {
            child.gas().clone()
        };
        assert!(parent.gas_mut().record_cost(child_gas.spent()));
        parent.stack_mut().push(U256::ZERO).unwrap();

        assert_eq!(parent.resume_after_trap(), stop());
        assert_eq!(parent.gas().remaining(), 1000 - child_limit);
        assert_eq!(parent.stack().data(), &[U256::ZERO]);
    }

    #[test]
    fn test_boxed_handler() {
        let handler: Box<dyn InterpreterHandler> = Box::new(NoopHandler);
        let mut m = Machine::new(Vec::new(), vec![Opcode::LOG0.as_u8()], 100, handler);
        assert_eq!(m.eval_loop(), MachineStatus::Trap(Opcode::LOG0));
    }

    #[test]
    fn test_borrowed_handler() {
        let mut handler = RecordingHandler::default();
        {
            let mut m = Machine::new(Vec::new(), vec![Opcode::TIMESTAMP.as_u8()], 100, &mut handler);
            assert_eq!(m.eval_loop(), MachineStatus::Trap(Opcode::TIMESTAMP));
        }
        assert_eq!(handler.seen, vec![(Opcode::TIMESTAMP, 0, 0)]);
    }
}

// =============================================================================
// 5. Return Data and Refunds
// =============================================================================

mod completion {
    use super::*;

    #[test]
    fn test_return_word() {
        // PUSH1 0x2a PUSH1 0 MSTORE PUSH1 32 PUSH1 0 RETURN
        let code = [0x60, 0x2a, 0x60, 0x00, 0x52, 0x60, 0x20, 0x60, 0x00, 0xf3];
        let mut m = machine(&code, 100);
        assert_eq!(
            m.eval_loop(),
            MachineStatus::Exit(ExitReason::Success(ExitSuccess::Return))
        );
        assert_eq!(m.return_range(), &(0..32));
        let output = m.return_value();
        assert_eq!(output.len(), 32);
        assert_eq!(output[31], 0x2a);
        assert!(m.stack().is_empty());
    }

    #[test]
    fn test_return_expands_memory() {
        // PUSH1 4 PUSH1 30 RETURN
        let mut m = machine(&[0x60, 0x04, 0x60, 0x1e, 0xf3], 100);
        assert_eq!(
            m.eval_loop(),
            MachineStatus::Exit(ExitReason::Success(ExitSuccess::Return))
        );
        assert_eq!(m.memory().len(), 64);
        assert_eq!(m.return_value(), vec![0; 4]);
        assert_eq!(m.gas().spent(), 3 + 3 + 6);
    }

    #[test]
    fn test_revert_empty() {
        // PUSH1 0 PUSH32 MAX REVERT: offset is ignored for an empty range
        let mut code = vec![0x60, 0x00, 0x7f];
        code.extend_from_slice(&[0xff; 32]);
        code.push(0xfd);
        let mut m = machine(&code, 100);
        assert_eq!(m.eval_loop(), MachineStatus::Exit(ExitReason::Revert));
        assert!(m.return_value().is_empty());
        assert!(m.memory().is_empty());
    }

    #[test]
    fn test_finalize_refund_london() {
        let mut m = machine(&[], 1000);
        assert!(m.gas_mut().record_cost(500));
        m.gas_mut().record_refund(300);
        m.finalize_refund();
        assert_eq!(m.gas().refunded(), 100);
    }

    #[test]
    fn test_finalize_refund_pre_london() {
        let mut m = Machine::with_config(
            Vec::new(),
            Vec::new(),
            1000,
            NoopHandler,
            Config::pre_london(),
        );
        assert!(m.gas_mut().record_cost(500));
        m.gas_mut().record_refund(300);
        m.finalize_refund();
        assert_eq!(m.gas().refunded(), 250);
    }

    #[test]
    fn test_memory_limit_from_config() {
        let config = Config {
            memory_limit: 32,
            ..Config::london()
        };
        // PUSH1 32 MLOAD
        let mut m = Machine::with_config(Vec::new(), vec![0x60, 0x20, 0x51], 1000, NoopHandler, config);
        assert_eq!(m.eval_loop(), error(ExitError::OutOfGas));
        assert!(m.memory().is_empty());
    }

    fn limited(code: &[u8]) -> Machine<NoopHandler> {
        let config = Config {
            memory_limit: 32,
            ..Config::london()
        };
        Machine::with_config(Vec::new(), code.to_vec(), 1000, NoopHandler, config)
    }

    #[test]
    fn test_mstore_past_memory_limit_keeps_operands() {
        // PUSH1 0x2a PUSH1 32 MSTORE
        let mut m = limited(&[0x60, 0x2a, 0x60, 0x20, 0x52]);
        assert_eq!(m.eval_loop(), error(ExitError::OutOfGas));
        assert_eq!(m.stack().data(), &[u(0x2a), u(32)]);
        assert!(m.memory().is_empty());
        // Two pushes and the static MSTORE charge, no expansion
        assert_eq!(m.gas().spent(), 9);
    }

    #[test]
    fn test_copy_past_memory_limit_keeps_operands() {
        // PUSH1 8 PUSH1 0 PUSH1 30 CODECOPY
        let mut m = limited(&[0x60, 0x08, 0x60, 0x00, 0x60, 0x1e, 0x39]);
        assert_eq!(m.eval_loop(), error(ExitError::OutOfGas));
        assert_eq!(m.stack().len(), 3);
        assert!(m.memory().is_empty());
    }

    #[test]
    fn test_return_past_memory_limit_keeps_operands() {
        // PUSH1 33 PUSH1 0 RETURN
        let mut m = limited(&[0x60, 0x21, 0x60, 0x00, 0xf3]);
        assert_eq!(m.eval_loop(), error(ExitError::OutOfGas));
        assert_eq!(m.stack().data(), &[u(33), u(0)]);
        assert!(m.return_value().is_empty());
    }

    #[test]
    fn test_within_memory_limit() {
        // PUSH1 0x2a PUSH1 0 MSTORE
        let mut m = limited(&[0x60, 0x2a, 0x60, 0x00, 0x52]);
        assert_eq!(m.eval_loop(), stop());
        assert_eq!(m.memory().len(), 32);
        assert_eq!(m.memory().get_word(0), u(0x2a));
    }
}
